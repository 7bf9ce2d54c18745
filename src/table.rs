use std::borrow::Cow;
use std::fmt::Write as _;

use crate::frame::Table;

/// Renders a table with its index labels as the first, unnamed column.
///
/// `max_rows` of 0 renders every row; otherwise the remainder is summarized
/// on a trailing `...` line.
pub fn render_frame(frame: &Table, max_rows: usize) -> String {
    let headers = std::iter::once(String::new())
        .chain(frame.column_names())
        .collect::<Vec<_>>();
    let shown = if max_rows == 0 {
        frame.row_count()
    } else {
        max_rows.min(frame.row_count())
    };
    let rows = frame
        .display_rows()
        .into_iter()
        .zip(frame.index())
        .take(shown)
        .map(|(cells, label)| std::iter::once(label.clone()).chain(cells).collect())
        .collect::<Vec<Vec<String>>>();
    let mut output = render_table(&headers, &rows);
    if shown < frame.row_count() {
        let _ = writeln!(output, "... {} more row(s)", frame.row_count() - shown);
    }
    output
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths);
    let _ = writeln!(output, "{header_line}");

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &separator_widths);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = display_width(sanitized.as_ref());
        let mut cell = sanitized.into_owned();
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
