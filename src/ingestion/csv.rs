//! Delimited-file reading and column type inference.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{ExportError, ExportResult};
use crate::types::{DATE_FORMAT, DataSet, DataType, Field, Schema, Value};

/// Untyped contents of one delimited file (or several concatenated ones).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, unique and in header order.
    pub headers: Vec<String>,
    /// Records padded to `headers.len()` cells.
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    /// Append `other`, taking the union of both column sets.
    ///
    /// Columns keep first-seen order; cells for columns a table does not have are left empty.
    pub fn concat(&mut self, other: RawTable) {
        let mut positions = Vec::with_capacity(other.headers.len());
        for header in &other.headers {
            let idx = match self.headers.iter().position(|h| h == header) {
                Some(idx) => idx,
                None => {
                    self.headers.push(header.clone());
                    for record in &mut self.records {
                        record.push(String::new());
                    }
                    self.headers.len() - 1
                }
            };
            positions.push(idx);
        }

        let width = self.headers.len();
        for record in other.records {
            let mut out = vec![String::new(); width];
            for (cell, &idx) in record.into_iter().zip(positions.iter()) {
                out[idx] = cell;
            }
            self.records.push(out);
        }
    }
}

/// Read a delimited file with a header row.
pub fn read_delimited_from_path(path: impl AsRef<Path>, delimiter: u8) -> ExportResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    read_delimited_from_reader(&mut rdr)
}

/// Read delimited data from an existing CSV reader.
///
/// Rules:
///
/// - The first record is the header row.
/// - Duplicate header names are made unique by appending `.1`, `.2`, ...
/// - Short records are padded with empty cells; records with more cells than headers are
///   rejected.
pub fn read_delimited_from_reader<R: Read>(rdr: &mut csv::Reader<R>) -> ExportResult<RawTable> {
    let raw_headers = rdr.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(ExportError::SchemaMismatch {
            message: "input has no header row".to_string(),
        });
    }
    let headers = unique_headers(raw_headers.iter());

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;
        if record.len() > headers.len() {
            return Err(ExportError::SchemaMismatch {
                message: format!(
                    "row {user_row} has {} fields but the header has {}",
                    record.len(),
                    headers.len()
                ),
            });
        }

        let mut row: Vec<String> = record.iter().map(str::to_owned).collect();
        row.resize(headers.len(), String::new());
        records.push(row);
    }

    Ok(RawTable { headers, records })
}

fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();
    for name in raw {
        let name = name.trim();
        let mut candidate = name.to_owned();
        while out.contains(&candidate) {
            let n = seen.entry(name.to_owned()).or_insert(0);
            *n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

/// Finer-grained cell kind; [`DataType::Other`] covers both floats and booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Integer,
    Date,
    Float,
    Bool,
    Text,
}

impl CellKind {
    fn data_type(self) -> DataType {
        match self {
            CellKind::Integer => DataType::Integer,
            CellKind::Date => DataType::Date,
            CellKind::Float | CellKind::Bool => DataType::Other,
            CellKind::Text => DataType::String,
        }
    }
}

/// Infer column types and convert a [`RawTable`] into a typed [`DataSet`].
pub fn infer_dataset(name: impl Into<String>, table: RawTable) -> DataSet {
    let kinds: Vec<CellKind> = (0..table.headers.len())
        .map(|col| infer_kind(table.records.iter().map(|r| r[col].as_str())))
        .collect();

    let schema = Schema::new(
        table
            .headers
            .into_iter()
            .zip(kinds.iter())
            .map(|(header, kind)| Field::new(header, kind.data_type()))
            .collect(),
    );

    let rows = table
        .records
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(kinds.iter())
                .map(|(raw, &kind)| parse_cell(kind, raw))
                .collect()
        })
        .collect();

    DataSet::new(name, schema, rows)
}

fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> CellKind {
    let mut has_gaps = false;
    let mut values = Vec::new();
    for cell in cells.map(str::trim) {
        if cell.is_empty() {
            has_gaps = true;
        } else {
            values.push(cell);
        }
    }
    if values.is_empty() {
        return CellKind::Text;
    }

    let (mut int, mut date, mut float, mut boolean) = (true, true, true, true);
    for cell in values {
        int &= cell.parse::<i64>().is_ok();
        date &= parse_date(cell).is_some();
        float &= cell.parse::<f64>().is_ok();
        boolean &= parse_bool(cell).is_some();
        if !(int || date || float || boolean) {
            return CellKind::Text;
        }
    }

    if int && !has_gaps {
        CellKind::Integer
    } else if int {
        // integers with gaps load as floats
        CellKind::Float
    } else if date {
        CellKind::Date
    } else if float {
        CellKind::Float
    } else {
        CellKind::Bool
    }
}

/// Numeric and boolean cells are parsed from their trimmed text; text and date cells are kept
/// exactly as read.
fn parse_cell(kind: CellKind, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    let parsed = match kind {
        CellKind::Integer => trimmed.parse::<i64>().ok().map(Value::Int64),
        CellKind::Float => trimmed.parse::<f64>().ok().map(Value::Float64),
        CellKind::Bool => parse_bool(trimmed).map(Value::Bool),
        CellKind::Date | CellKind::Text => None,
    };
    parsed.unwrap_or_else(|| Value::Utf8(raw.to_owned()))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
