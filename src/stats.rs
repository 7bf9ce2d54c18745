//! Descriptive statistics over numeric columns and the statistical summary
//! operation.

use std::collections::HashMap;

use log::debug;

use crate::{
    data::{ColumnType, Value},
    frame::{Column, Table},
};

pub const NUMERIC_SUMMARY_ROWS: &[&str] =
    &["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
pub const CATEGORICAL_SUMMARY_ROWS: &[&str] = &["count", "unique", "top", "freq"];

/// Statistics for the non-missing values of one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    sorted: Vec<f64>,
    sum: f64,
}

impl ColumnStats {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let sum = sorted.iter().sum();
        Self { sorted, sum }
    }

    pub fn from_column(column: &Column) -> Self {
        Self::from_values(&column.numeric_values())
    }

    pub fn count(&self) -> usize {
        self.sorted.len()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.sorted.is_empty() {
            None
        } else {
            Some(self.sum / self.count() as f64)
        }
    }

    pub fn median(&self) -> Option<f64> {
        self.quantile(0.5)
    }

    /// Sample standard deviation; undefined below two observations.
    pub fn std_dev(&self) -> Option<f64> {
        if self.count() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let squares: f64 = self.sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((squares / (self.count() as f64 - 1.0)).sqrt())
    }

    pub fn min(&self) -> Option<f64> {
        self.sorted.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    /// Quantile with linear interpolation between closest ranks.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        if self.sorted.is_empty() {
            return None;
        }
        let position = q.clamp(0.0, 1.0) * (self.count() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;
        let low = self.sorted[lower];
        let high = self.sorted[upper];
        Some(low + (high - low) * fraction)
    }

    /// Most frequent value when it occurs at least twice; ties go to the smallest.
    pub fn mode(&self) -> Option<f64> {
        let mut best: Option<(f64, usize)> = None;
        let mut idx = 0;
        while idx < self.sorted.len() {
            let value = self.sorted[idx];
            let run = self.sorted[idx..]
                .iter()
                .take_while(|v| v.total_cmp(&value).is_eq())
                .count();
            if best.is_none_or(|(_, count)| run > count) {
                best = Some((value, run));
            }
            idx += run;
        }
        best.filter(|(_, count)| *count >= 2).map(|(value, _)| value)
    }
}

/// Replaces the table with descriptive statistics, one statistic per row.
///
/// Numeric columns are summarized when present; otherwise every column gets
/// a categorical summary (count, unique, top, freq).
pub fn describe(table: &Table) -> Table {
    let numeric = table
        .columns()
        .iter()
        .filter(|c| c.is_numeric())
        .collect::<Vec<_>>();
    if !numeric.is_empty() {
        debug!("Describing {} numeric column(s)", numeric.len());
        return describe_numeric(&numeric);
    }
    if table.column_count() == 0 {
        return Table::empty();
    }
    debug!(
        "No numeric columns; describing {} categorical column(s)",
        table.column_count()
    );
    describe_categorical(table.columns())
}

fn describe_numeric(columns: &[&Column]) -> Table {
    let index = labels(NUMERIC_SUMMARY_ROWS);
    let columns = columns
        .iter()
        .map(|column| {
            let stats = ColumnStats::from_column(column);
            let metrics = [
                Some(stats.count() as f64),
                stats.mean(),
                stats.std_dev(),
                stats.min(),
                stats.quantile(0.25),
                stats.quantile(0.5),
                stats.quantile(0.75),
                stats.max(),
            ];
            Column::new(
                column.name.clone(),
                ColumnType::Float,
                metrics.into_iter().map(|m| m.map(Value::Float)).collect(),
            )
        })
        .collect();
    Table::with_index(index, columns).unwrap_or_else(|_| Table::empty())
}

fn describe_categorical(columns: &[Column]) -> Table {
    let index = labels(CATEGORICAL_SUMMARY_ROWS);
    let columns = columns
        .iter()
        .map(|column| {
            let mut order: Vec<String> = Vec::new();
            let mut counts: HashMap<String, usize> = HashMap::new();
            for value in column.values.iter().flatten() {
                let key = value.as_display();
                let entry = counts.entry(key.clone()).or_insert_with(|| {
                    order.push(key);
                    0
                });
                *entry += 1;
            }
            let count = counts.values().sum::<usize>();
            let top = order
                .iter()
                .fold(None::<(&String, usize)>, |best, key| {
                    let freq = counts[key];
                    match best {
                        Some((_, best_freq)) if best_freq >= freq => best,
                        _ => Some((key, freq)),
                    }
                });
            let values = vec![
                Some(Value::Integer(count as i64)),
                Some(Value::Integer(order.len() as i64)),
                top.map(|(key, _)| Value::Text(key.clone())),
                top.map(|(_, freq)| Value::Integer(freq as i64)),
            ];
            Column::new(column.name.clone(), ColumnType::Text, values)
        })
        .collect();
    Table::with_index(index, columns).unwrap_or_else(|_| Table::empty())
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
