//! In-memory table model shared by the loader, the transformations, and the
//! chart selector.
//!
//! A [`Table`] is an ordered list of typed [`Column`]s of equal length plus a
//! row index. Index labels start as `0..n` and travel with their rows, so a
//! filtered table still shows which source rows survived.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::data::{ColumnType, Value};

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("Column '{column}' has {actual} value(s) but the table has {expected} row(s)")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Non-missing values converted to `f64`; empty for non-numeric columns.
    pub fn numeric_values(&self) -> Vec<f64> {
        if !self.is_numeric() {
            return Vec::new();
        }
        self.values
            .iter()
            .filter_map(|v| v.as_ref().and_then(Value::as_f64))
            .collect()
    }

    pub fn display_value(&self, row: usize) -> String {
        match self.values.get(row) {
            Some(Some(value)) => value.as_display(),
            _ if self.is_numeric() => "NaN".to_string(),
            _ => "None".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table with a default `0..n` index.
    pub fn new(columns: Vec<Column>) -> Result<Self, FrameError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let index = (0..rows).map(|i| i.to_string()).collect();
        Self::with_index(index, columns)
    }

    pub fn with_index(index: Vec<String>, columns: Vec<Column>) -> Result<Self, FrameError> {
        let expected = index.len();
        for column in &columns {
            if column.len() != expected {
                return Err(FrameError::LengthMismatch {
                    column: column.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    pub fn empty() -> Self {
        Self {
            index: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn categorical_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn row_has_missing(&self, row: usize) -> bool {
        self.columns
            .iter()
            .any(|c| matches!(c.values.get(row), Some(None)))
    }

    /// Returns a new table holding `rows` in the given order, index labels included.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let index = rows.iter().map(|&r| self.index[r].clone()).collect();
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                dtype: column.dtype,
                values: rows.iter().map(|&r| column.values[r].clone()).collect(),
            })
            .collect();
        Table { index, columns }
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.columns.iter_mut().find(|c| c.name == from) {
            Some(column) => {
                column.name = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Display strings for every row, suitable for the text table view.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count())
            .map(|row| self.columns.iter().map(|c| c.display_value(row)).collect())
            .collect()
    }

    /// Row records keyed by column name; missing cells become `null`.
    pub fn records(&self) -> Vec<Map<String, JsonValue>> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| {
                        let cell = match &column.values[row] {
                            Some(value) => cell_to_json(value),
                            None => JsonValue::Null,
                        };
                        (column.name.clone(), cell)
                    })
                    .collect()
            })
            .collect()
    }
}

fn cell_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Integer(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Text(s) => JsonValue::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "cat",
                ColumnType::Text,
                vec![
                    Some(Value::Text("a".into())),
                    Some(Value::Text("a".into())),
                    Some(Value::Text("b".into())),
                ],
            ),
            Column::new(
                "val",
                ColumnType::Float,
                vec![Some(Value::Float(1.0)), None, Some(Value::Float(3.0))],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", ColumnType::Integer, vec![Some(Value::Integer(1))]),
            Column::new("b", ColumnType::Integer, vec![]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FrameError::LengthMismatch {
                column: "b".into(),
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn select_rows_keeps_index_labels() {
        let table = sample();
        let selected = table.select_rows(&[0, 2]);
        assert_eq!(selected.index(), &["0".to_string(), "2".to_string()]);
        assert_eq!(selected.column("cat").unwrap().display_value(1), "b");
    }

    #[test]
    fn classifies_numeric_and_categorical_columns() {
        let table = sample();
        assert_eq!(table.numeric_column_names(), vec!["val".to_string()]);
        assert_eq!(table.categorical_column_names(), vec!["cat".to_string()]);
        assert!(table.row_has_missing(1));
        assert!(!table.row_has_missing(0));
    }

    #[test]
    fn records_emit_null_for_missing_cells() {
        let records = sample().records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1]["val"], JsonValue::Null);
        assert_eq!(records[2]["val"], serde_json::json!(3.0));
        assert_eq!(records[0]["cat"], serde_json::json!("a"));
    }
}
