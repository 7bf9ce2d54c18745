//! Missing-data handling: dropping incomplete rows, statistic-based
//! imputation for numeric columns, and forward/backward filling.

use clap::ValueEnum;
use log::debug;

use crate::{
    data::{ColumnType, Value},
    frame::{Column, Table},
    stats::ColumnStats,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum MissingMethod {
    #[default]
    Nothing,
    DropRow,
    Mean,
    Median,
    StdDev,
    Mode,
    PreviousRow,
    NextRow,
}

impl MissingMethod {
    pub fn label(self) -> &'static str {
        match self {
            MissingMethod::Nothing => "Do nothing",
            MissingMethod::DropRow => "Drop that Row",
            MissingMethod::Mean => "With Mean",
            MissingMethod::Median => "With Median",
            MissingMethod::StdDev => "With Standard Deviation",
            MissingMethod::Mode => "With Mode",
            MissingMethod::PreviousRow => "Data From Previous Row",
            MissingMethod::NextRow => "Data From Next Row",
        }
    }
}

pub fn handle_missing(table: &Table, method: MissingMethod) -> Table {
    debug!("Handling missing data: {}", method.label());
    match method {
        MissingMethod::Nothing => table.clone(),
        MissingMethod::DropRow => drop_incomplete_rows(table),
        MissingMethod::Mean => fill_numeric(table, ColumnStats::mean),
        MissingMethod::Median => fill_numeric(table, ColumnStats::median),
        MissingMethod::StdDev => fill_numeric(table, ColumnStats::std_dev),
        MissingMethod::Mode => fill_numeric(table, ColumnStats::mode),
        MissingMethod::PreviousRow => fill_from_neighbour(table, false),
        MissingMethod::NextRow => fill_from_neighbour(table, true),
    }
}

fn drop_incomplete_rows(table: &Table) -> Table {
    let keep = (0..table.row_count())
        .filter(|&row| !table.row_has_missing(row))
        .collect::<Vec<_>>();
    debug!(
        "Dropping {} of {} row(s) with missing values",
        table.row_count() - keep.len(),
        table.row_count()
    );
    table.select_rows(&keep)
}

fn fill_numeric<F>(table: &Table, statistic: F) -> Table
where
    F: Fn(&ColumnStats) -> Option<f64>,
{
    let mut filled = table.clone();
    for column in filled.columns_mut() {
        if !column.is_numeric() || column.missing_count() == 0 {
            continue;
        }
        let Some(replacement) = statistic(&ColumnStats::from_column(column)) else {
            debug!("No fill value for column '{}'", column.name);
            continue;
        };
        fill_column(column, replacement);
    }
    filled
}

fn fill_column(column: &mut Column, replacement: f64) {
    column.dtype = ColumnType::Float;
    for cell in column.values.iter_mut() {
        *cell = match cell.take() {
            Some(Value::Integer(i)) => Some(Value::Float(i as f64)),
            Some(other) => Some(other),
            None => Some(Value::Float(replacement)),
        };
    }
}

fn fill_from_neighbour(table: &Table, backward: bool) -> Table {
    let mut filled = table.clone();
    for column in filled.columns_mut() {
        let mut last: Option<Value> = None;
        let mut carry = |cell: &mut Option<Value>| {
            if let Some(value) = cell.as_ref() {
                last = Some(value.clone());
            } else {
                *cell = last.clone();
            }
        };
        if backward {
            column.values.iter_mut().rev().for_each(&mut carry);
        } else {
            column.values.iter_mut().for_each(&mut carry);
        }
    }
    filled
}
