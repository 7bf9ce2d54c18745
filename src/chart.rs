//! Chart binding: turns a chart kind and column selections into a
//! declarative [`ChartSpec`] for an external plotting library.
//!
//! Choices follow column types. Value axes prefer numeric columns and fall
//! back to every column when none is numeric; colour grouping and pie labels
//! only accept categorical columns. Nothing here computes geometry.

use std::fmt;

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::frame::Table;

pub const NO_COLOR: &str = "None";
pub const NOT_ENOUGH_COLUMNS: &str = "Not enough columns to visualise.";
pub const PIE_NEEDS_CATEGORY: &str = "Pie chart needs at least one categorical column.";

#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("'{column}' is not a valid {field} column (choices: {choices})")]
    InvalidSelection {
        field: &'static str,
        column: String,
        choices: String,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column selections for one render; unset fields take the first choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRequest {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
    pub names: Option<String>,
    pub values: Option<String>,
}

/// Columns offered for each binding of a chart kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoices {
    pub all: Vec<String>,
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnChoices {
    pub fn from_table(table: &Table) -> Self {
        Self {
            all: table.column_names(),
            numeric: table.numeric_column_names(),
            categorical: table.categorical_column_names(),
        }
    }

    /// Numeric columns, or every column when the table has none.
    pub fn values(&self) -> &[String] {
        if self.numeric.is_empty() {
            &self.all
        } else {
            &self.numeric
        }
    }

    pub fn colors(&self) -> Vec<String> {
        std::iter::once(NO_COLOR.to_string())
            .chain(self.categorical.iter().cloned())
            .collect()
    }

    pub fn x_axis(&self, kind: ChartKind) -> &[String] {
        match kind {
            ChartKind::Scatter => self.values(),
            _ => &self.all,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub markers: bool,
    pub data: Vec<Map<String, JsonValue>>,
}

impl ChartSpec {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Chart(ChartSpec),
    Warning(&'static str),
}

pub fn build_chart(
    kind: ChartKind,
    table: &Table,
    request: &ChartRequest,
    template: &str,
) -> Result<ChartOutcome, ChartError> {
    let choices = ColumnChoices::from_table(table);
    if choices.all.is_empty() {
        return Ok(ChartOutcome::Warning(NOT_ENOUGH_COLUMNS));
    }

    let mut spec = ChartSpec {
        kind,
        title: String::new(),
        template: template.to_string(),
        x: None,
        y: None,
        color: None,
        names: None,
        values: None,
        markers: kind == ChartKind::Line,
        data: table.records(),
    };

    match kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Scatter => {
            let x = pick("x", request.x.as_deref(), choices.x_axis(kind))?;
            let y = pick("y", request.y.as_deref(), choices.values())?;
            let color = pick("color", request.color.as_deref(), &choices.colors())?;
            spec.title = match kind {
                ChartKind::Bar => format!("{y} by {x}"),
                ChartKind::Line => format!("{y} over {x}"),
                _ => format!("{y} vs {x}"),
            };
            spec.x = Some(x);
            spec.y = Some(y);
            spec.color = (color != NO_COLOR).then_some(color);
        }
        ChartKind::Pie => {
            if choices.categorical.is_empty() {
                return Ok(ChartOutcome::Warning(PIE_NEEDS_CATEGORY));
            }
            let names = pick("names", request.names.as_deref(), &choices.categorical)?;
            let values = pick("values", request.values.as_deref(), choices.values())?;
            spec.title = format!("{values} by {names}");
            spec.names = Some(names);
            spec.values = Some(values);
        }
    }
    Ok(ChartOutcome::Chart(spec))
}

fn pick(
    field: &'static str,
    requested: Option<&str>,
    choices: &[String],
) -> Result<String, ChartError> {
    match requested {
        Some(column) if choices.iter().any(|c| c == column) => Ok(column.to_string()),
        Some(column) => Err(ChartError::InvalidSelection {
            field,
            column: column.to_string(),
            choices: choices.iter().join(", "),
        }),
        // Callers guarantee at least one choice.
        None => Ok(choices.first().cloned().unwrap_or_default()),
    }
}
