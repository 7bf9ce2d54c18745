//! File loading: turns an uploaded byte stream into a typed [`Table`].
//!
//! The decoder is chosen from the file extension. Delimited text goes through
//! the `csv` crate with per-column type inference; `.xlsx` workbooks go
//! through `calamine`, whose cells are already typed.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::Timelike;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};
use thiserror::Error;

use crate::{
    data::{ColumnType, TypeCandidate, Value, is_na, parse_typed_value},
    frame::{Column, FrameError, Table},
    io_utils::{self, DEFAULT_CSV_DELIMITER, SourceFormat},
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type for '{0}' (expected .csv or .xlsx)")]
    UnsupportedFormat(String),
    #[error("No columns to parse from file")]
    Empty,
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("Workbook does not contain any worksheets")]
    NoWorksheet,
    #[error("Line {line} is not valid {encoding} text")]
    Decode {
        line: usize,
        encoding: &'static str,
    },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

pub fn load_table(
    bytes: &[u8],
    file_name: &str,
    options: &LoadOptions,
) -> Result<Table, LoadError> {
    let format = io_utils::detect_format(file_name)
        .ok_or_else(|| LoadError::UnsupportedFormat(file_name.to_string()))?;
    debug!("Decoding '{file_name}' as {format:?}");
    let table = match format {
        SourceFormat::Csv => load_csv(bytes, options)?,
        SourceFormat::Xlsx => load_xlsx(bytes)?,
    };
    info!(
        "Loaded {} row(s) x {} column(s) from '{}'",
        table.row_count(),
        table.column_count(),
        file_name
    );
    Ok(table)
}

fn load_csv(bytes: &[u8], options: &LoadOptions) -> Result<Table, LoadError> {
    let encoding = options.encoding;
    let mut reader = io_utils::open_csv_reader(bytes, options.delimiter);
    let raw_headers = reader.byte_headers()?.clone();
    if raw_headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let headers = io_utils::decode_record(&raw_headers, encoding).ok_or(LoadError::Decode {
        line: 1,
        encoding: encoding.name(),
    })?;

    let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.byte_records() {
        let record = record?;
        let decoded = io_utils::decode_record(&record, encoding).ok_or_else(|| LoadError::Decode {
            line: record.position().map_or(0, |p| p.line() as usize),
            encoding: encoding.name(),
        })?;
        for (column, raw) in fields.iter_mut().zip(decoded) {
            column.push((!is_na(&raw)).then_some(raw));
        }
    }

    let columns = normalize_headers(headers)
        .into_iter()
        .zip(fields)
        .map(|(name, raw)| typed_column(name, raw))
        .collect();
    Ok(Table::new(columns)?)
}

fn typed_column(name: String, raw: Vec<Option<String>>) -> Column {
    let mut candidate = TypeCandidate::new();
    for field in &raw {
        candidate.observe(field.as_deref());
    }
    let dtype = candidate.decide();
    debug!("Column '{name}' inferred as {dtype}");
    let values = raw
        .into_iter()
        .map(|field| field.and_then(|f| parse_typed_value(&f, dtype)))
        .collect();
    Column::new(name, dtype, values)
}

fn load_xlsx(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoWorksheet)??;
    // Rows are relative to `range.start()`; blank columns left of the used
    // range still count as sheet columns.
    let leading = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(LoadError::Empty);
    };
    let headers = std::iter::repeat_n(String::new(), leading)
        .chain(header_row.iter().map(|cell| match cell_value(cell) {
            Some(value) => value.as_display(),
            None => String::new(),
        }))
        .collect::<Vec<_>>();

    let mut cells: Vec<Vec<Option<Value>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        let (blank, used) = cells.split_at_mut(leading);
        blank.iter_mut().for_each(|column| column.push(None));
        for (column, cell) in used.iter_mut().zip(row) {
            column.push(cell_value(cell));
        }
    }

    let columns = normalize_headers(headers)
        .into_iter()
        .zip(cells)
        .map(|(name, values)| unify_column(name, values))
        .collect();
    Ok(Table::new(columns)?)
}

fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::Int(i) => Some(Value::Integer(*i)),
        Data::Float(f) if f.is_nan() => None,
        Data::Float(f) => Some(Value::Float(*f)),
        Data::Bool(b) => Some(Value::Boolean(*b)),
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::DateTime(dt) => Some(Value::Text(match dt.as_datetime() {
            Some(stamp) if stamp.num_seconds_from_midnight() == 0 => {
                stamp.format("%Y-%m-%d").to_string()
            }
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        })),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
    }
}

/// Settles a column of already-typed spreadsheet cells on one type.
fn unify_column(name: String, values: Vec<Option<Value>>) -> Column {
    let present = values.iter().flatten().collect::<Vec<_>>();
    let has_missing = present.len() < values.len();
    let all_numeric = present.iter().all(|v| v.as_f64().is_some());
    let all_boolean = present.iter().all(|v| matches!(v, Value::Boolean(_)));

    let dtype = if present.is_empty() {
        ColumnType::Float
    } else if all_numeric {
        let integral = present.iter().all(|v| match v {
            Value::Integer(_) => true,
            Value::Float(f) => f.fract() == 0.0 && f.abs() < 9.0e15,
            _ => false,
        });
        if integral && !has_missing {
            ColumnType::Integer
        } else {
            ColumnType::Float
        }
    } else if all_boolean && !has_missing {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    };

    let values = values
        .into_iter()
        .map(|cell| {
            cell.map(|value| match (dtype, value) {
                (ColumnType::Integer, Value::Float(f)) => Value::Integer(f as i64),
                (ColumnType::Float, Value::Integer(i)) => Value::Float(i as f64),
                (ColumnType::Text, Value::Text(s)) => Value::Text(s),
                (ColumnType::Text, other) => Value::Text(other.as_display()),
                (_, other) => other,
            })
        })
        .collect();
    Column::new(name, dtype, values)
}

/// Names blank headers `Unnamed: {position}` and suffixes repeats with `.1`, `.2`, ...
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for (position, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {position}")
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}
