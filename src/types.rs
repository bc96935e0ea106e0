//! Core data model types.
//!
//! Loaded input files become an in-memory [`DataSet`]: a [`Schema`] of typed [`Field`]s plus
//! row-major [`Value`] storage. The column [`DataType`] is inferred once at load time and drives
//! remote schema classification (see [`crate::reconcile::classify`]).

/// Date format a column must match to be inferred as [`DataType::Date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inferred column type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Every non-empty cell is a 64-bit signed integer.
    Integer,
    /// Free text (also used for columns without any non-empty cell).
    String,
    /// Every non-empty cell is a calendar date (`YYYY-MM-DD`). Cells keep their text.
    Date,
    /// Any other scalar: floats, booleans, and integer columns with gaps.
    Other,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing a dataset's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string, exactly as read (text and date columns).
    Utf8(String),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Dataset name, derived from the input file name.
    pub name: String,
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from name, schema and rows.
    pub fn new(name: impl Into<String>, schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            schema,
            rows,
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }
}
