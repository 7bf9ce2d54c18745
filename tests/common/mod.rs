#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tabular_dashboard::{
    data::{ColumnType, Value},
    frame::{Column, Table},
};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }
}

pub fn text(value: &str) -> Option<Value> {
    Some(Value::Text(value.to_string()))
}

pub fn float(value: f64) -> Option<Value> {
    Some(Value::Float(value))
}

/// `[{cat:"a",val:1},{cat:"a",val:null},{cat:"b",val:3}]`
pub fn cat_val_table() -> Table {
    Table::new(vec![
        Column::new("cat", ColumnType::Text, vec![text("a"), text("a"), text("b")]),
        Column::new("val", ColumnType::Float, vec![float(1.0), None, float(3.0)]),
    ])
    .expect("cat/val table")
}

pub fn float_values(table: &Table, column: &str) -> Vec<Option<f64>> {
    table
        .column(column)
        .expect("column exists")
        .values
        .iter()
        .map(|v| v.as_ref().and_then(Value::as_f64))
        .collect()
}
