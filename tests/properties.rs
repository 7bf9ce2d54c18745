mod common;

use proptest::prelude::*;
use tabular_dashboard::{
    data::{ColumnType, Value},
    frame::{Column, Table},
    missing::MissingMethod,
    transform::{Operation, apply},
};

use common::float_values;

fn reference_mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn reference_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn reference_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = reference_mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn build(cells: &[Option<f64>]) -> Table {
    Table::new(vec![Column::new(
        "x",
        ColumnType::Float,
        cells.iter().map(|c| c.map(Value::Float)).collect(),
    )])
    .unwrap()
}

fn assert_filled(
    cells: &[Option<f64>],
    method: MissingMethod,
    reference: fn(&[f64]) -> Option<f64>,
) -> Result<(), TestCaseError> {
    let present = cells.iter().flatten().copied().collect::<Vec<_>>();
    let expected = reference(&present);
    let result = apply(&Operation::HandleMissing(method), &build(cells)).unwrap();
    let filled = float_values(&result.table, "x");
    prop_assert_eq!(filled.len(), cells.len());
    for (before, after) in cells.iter().zip(&filled) {
        match (before, expected) {
            (Some(original), _) => prop_assert_eq!(*after, Some(*original)),
            (None, Some(stat)) => {
                let got = after.expect("missing cell was filled");
                prop_assert!((got - stat).abs() <= 1e-9 * stat.abs().max(1.0));
            }
            (None, None) => prop_assert_eq!(*after, None),
        }
    }
    Ok(())
}

fn cells() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.7, -1_000.0f64..1_000.0), 0..24)
}

proptest! {
    #[test]
    fn mean_fill_matches_reference(cells in cells()) {
        assert_filled(&cells, MissingMethod::Mean, reference_mean)?;
    }

    #[test]
    fn median_fill_matches_reference(cells in cells()) {
        assert_filled(&cells, MissingMethod::Median, reference_median)?;
    }

    #[test]
    fn std_dev_fill_matches_reference(cells in cells()) {
        assert_filled(&cells, MissingMethod::StdDev, reference_std)?;
    }

    #[test]
    fn drop_row_removes_exactly_incomplete_rows(cells in cells()) {
        let result = apply(&Operation::HandleMissing(MissingMethod::DropRow), &build(&cells)).unwrap();
        let expected = cells.iter().flatten().map(|v| Some(*v)).collect::<Vec<_>>();
        prop_assert_eq!(float_values(&result.table, "x"), expected);
    }
}
