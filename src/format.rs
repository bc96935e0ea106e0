//! Row formatting for the source-data endpoint.

use serde_json::{Map, Number, Value as JsonValue};

use crate::types::{DataSet, Schema, Value};

/// One row as a flat JSON object, keys in schema column order.
pub type Record = Map<String, JsonValue>;

/// Convert one row into a [`Record`].
///
/// Values are taken as loaded; text and date cells go out exactly as read. Non-finite floats
/// become `null`.
pub fn format_row(schema: &Schema, row: &[Value]) -> Record {
    schema
        .fields
        .iter()
        .zip(row.iter())
        .map(|(field, value)| (field.name.clone(), to_json(value)))
        .collect()
}

/// Format every row of `dataset`, preserving row order.
pub fn format_records(dataset: &DataSet) -> Vec<Record> {
    dataset
        .rows
        .iter()
        .map(|row| format_row(&dataset.schema, row))
        .collect()
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int64(v) => JsonValue::from(*v),
        Value::Float64(v) => Number::from_f64(*v).map_or(JsonValue::Null, JsonValue::Number),
        Value::Bool(v) => JsonValue::Bool(*v),
        Value::Utf8(s) => JsonValue::String(s.clone()),
    }
}
