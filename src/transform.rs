//! Operation dispatch.
//!
//! Every render applies exactly one [`Operation`] to the freshly loaded
//! table; results are never fed into the next render. Widget-style defaults
//! (first column, first group, unchanged name) are filled in by
//! [`OperationRequest::resolve`] before dispatch.

use clap::ValueEnum;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    data::Value,
    filter,
    frame::Table,
    missing::{self, MissingMethod},
    stats,
    view::Notice,
};

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),
    #[error("Value '{value}' is not a group of column '{column}' (choices: {candidates})")]
    UnknownGroup {
        column: String,
        value: String,
        candidates: String,
    },
    #[error("Table has no columns to select from")]
    NoColumns,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OperationKind {
    #[default]
    MissingData,
    GroupFilter,
    Summary,
    Rename,
}

impl OperationKind {
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::MissingData => "Handling Missing Data",
            OperationKind::GroupFilter => "Groupwise Filter",
            OperationKind::Summary => "Statistical Summary",
            OperationKind::Rename => "Rename Column",
        }
    }
}

/// Raw user selections; unset fields take the first available choice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub method: Option<MissingMethod>,
    pub column: Option<String>,
    pub value: Option<String>,
    pub new_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    HandleMissing(MissingMethod),
    GroupFilter {
        column: String,
        value: Option<Value>,
    },
    Summary,
    Rename {
        from: String,
        to: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub table: Table,
    pub notices: Vec<Notice>,
}

impl OperationRequest {
    pub fn resolve(&self, table: &Table) -> Result<Operation, TransformError> {
        match self.kind {
            OperationKind::MissingData => Ok(Operation::HandleMissing(
                self.method.unwrap_or_default(),
            )),
            OperationKind::Summary => Ok(Operation::Summary),
            OperationKind::GroupFilter => {
                let column = self.select_column(table)?;
                let source = table
                    .column(&column)
                    .ok_or_else(|| TransformError::UnknownColumn(column.clone()))?;
                let value = match self.value.as_deref() {
                    Some(raw) => Some(filter::resolve_group_value(source, raw)?),
                    None => filter::group_candidates(source).into_iter().next(),
                };
                Ok(Operation::GroupFilter { column, value })
            }
            OperationKind::Rename => {
                let from = self.select_column(table)?;
                let to = self.new_name.clone().unwrap_or_else(|| from.clone());
                Ok(Operation::Rename { from, to })
            }
        }
    }

    fn select_column(&self, table: &Table) -> Result<String, TransformError> {
        match &self.column {
            Some(name) if table.column(name).is_some() => Ok(name.clone()),
            Some(name) => Err(TransformError::UnknownColumn(name.clone())),
            None => table
                .columns()
                .first()
                .map(|c| c.name.clone())
                .ok_or(TransformError::NoColumns),
        }
    }
}

pub fn apply(operation: &Operation, table: &Table) -> Result<Transformed, TransformError> {
    debug!("Applying {operation:?}");
    let mut notices = Vec::new();
    let table = match operation {
        Operation::HandleMissing(method) => missing::handle_missing(table, *method),
        Operation::GroupFilter { column, value } => {
            filter::filter_group(table, column, value.as_ref())?
        }
        Operation::Summary => stats::describe(table),
        Operation::Rename { from, to } => {
            if table.column(from).is_none() {
                return Err(TransformError::UnknownColumn(from.clone()));
            }
            if to.is_empty() || to == from {
                table.clone()
            } else if table.column(to).is_some() {
                warn!("Refusing to rename '{from}' onto existing column '{to}'");
                notices.push(Notice::warning(format!(
                    "Column \"{to}\" already exists; \"{from}\" was not renamed"
                )));
                table.clone()
            } else {
                let mut renamed = table.clone();
                renamed.rename_column(from, to);
                notices.push(Notice::success(format!("Renamed \"{from}\" → \"{to}\"")));
                renamed
            }
        }
    };
    Ok(Transformed { table, notices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::ColumnType, frame::Column, view::NoticeLevel};

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
    fn defaults_follow_first_choices() {
        let table = sample();
        let request = OperationRequest {
            kind: OperationKind::GroupFilter,
            ..Default::default()
        };
        assert_eq!(
            request.resolve(&table).unwrap(),
            Operation::GroupFilter {
                column: "cat".into(),
                value: Some(Value::Text("a".into())),
            }
        );
        let request = OperationRequest::default();
        assert_eq!(
            request.resolve(&table).unwrap(),
            Operation::HandleMissing(MissingMethod::Nothing)
        );
        let request = OperationRequest {
            kind: OperationKind::Rename,
            ..Default::default()
        };
        assert_eq!(
            request.resolve(&table).unwrap(),
            Operation::Rename {
                from: "cat".into(),
                to: "cat".into()
            }
        );
    }

    #[test]
    fn rename_reports_success() {
        let result = apply(
            &Operation::Rename {
                from: "val".into(),
                to: "value".into(),
            },
            &sample(),
        )
        .unwrap();
        assert_eq!(
            result.table.column_names(),
            vec!["cat".to_string(), "value".to_string()]
        );
        assert_eq!(result.notices.len(), 1);
        assert_eq!(result.notices[0].level, NoticeLevel::Success);
        assert_eq!(result.notices[0].message, "Renamed \"val\" → \"value\"");
    }

    #[test]
    fn rename_onto_existing_column_is_refused() {
        let table = sample();
        let result = apply(
            &Operation::Rename {
                from: "val".into(),
                to: "cat".into(),
            },
            &table,
        )
        .unwrap();
        assert_eq!(result.table, table);
        assert_eq!(result.notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn unknown_columns_fail_resolution() {
        let request = OperationRequest {
            kind: OperationKind::Rename,
            column: Some("nope".into()),
            ..Default::default()
        };
        assert_eq!(
            request.resolve(&sample()).unwrap_err(),
            TransformError::UnknownColumn("nope".into())
        );
        let request = OperationRequest {
            kind: OperationKind::GroupFilter,
            ..Default::default()
        };
        assert_eq!(
            request.resolve(&Table::empty()).unwrap_err(),
            TransformError::NoColumns
        );
    }
}
