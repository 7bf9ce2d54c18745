use itertools::Itertools;

use crate::{
    data::{Value, parse_typed_value},
    frame::{Column, Table},
    transform::TransformError,
};

/// Distinct non-missing values of `column` in order of first appearance.
pub fn group_candidates(column: &Column) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    for value in column.values.iter().flatten() {
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }
    seen
}

/// Resolves a raw group value against the candidates of `column`.
pub fn resolve_group_value(column: &Column, raw: &str) -> Result<Value, TransformError> {
    let candidates = group_candidates(column);
    let matched = parse_typed_value(raw, column.dtype)
        .filter(|parsed| candidates.contains(parsed))
        .or_else(|| {
            candidates
                .iter()
                .find(|candidate| candidate.as_display() == raw)
                .cloned()
        });
    matched.ok_or_else(|| TransformError::UnknownGroup {
        column: column.name.clone(),
        value: raw.to_string(),
        candidates: candidates.iter().map(Value::as_display).join(", "),
    })
}

/// Keeps the rows whose `column` cell equals `value`.
///
/// A `None` value matches nothing, mirroring an empty selection.
pub fn filter_group(
    table: &Table,
    column: &str,
    value: Option<&Value>,
) -> Result<Table, TransformError> {
    let source = table
        .column(column)
        .ok_or_else(|| TransformError::UnknownColumn(column.to_string()))?;
    let keep = source
        .values
        .iter()
        .positions(|cell| value.is_some() && cell.as_ref() == value)
        .collect::<Vec<_>>();
    Ok(table.select_rows(&keep))
}
