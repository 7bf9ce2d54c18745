use std::fmt::{self, Write as _};

use crate::{chart::ChartSpec, frame::Table, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
        })
    }
}

/// A user-facing message shown alongside the rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Everything one render cycle shows.
///
/// `table` is `None` only when rendering halted before a file was loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    pub operation: Option<&'static str>,
    pub table: Option<Table>,
    pub notices: Vec<Notice>,
    pub chart: Option<ChartSpec>,
}

impl View {
    pub fn halted(title: impl Into<String>, notice: Notice) -> Self {
        Self {
            title: title.into(),
            operation: None,
            table: None,
            notices: vec![notice],
            chart: None,
        }
    }
}

/// Text rendering of a view; `max_rows` of 0 shows every row.
pub fn render_text(view: &View, max_rows: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", view.title);
    for notice in &view.notices {
        let _ = writeln!(output, "{notice}");
    }
    if let Some(data) = &view.table {
        if let Some(operation) = view.operation {
            let _ = writeln!(output, "## {operation}");
        }
        output.push_str(&table::render_frame(data, max_rows));
        let _ = writeln!(
            output,
            "({} row(s) x {} column(s))",
            data.row_count(),
            data.column_count()
        );
    }
    if let Some(chart) = &view.chart {
        let _ = writeln!(output, "## Data Visualisation: {}", chart.title);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halted_view_shows_only_the_notice() {
        let view = View::halted(
            "Dashboard",
            Notice::info("Please upload a file to proceed."),
        );
        let text = render_text(&view, 0);
        assert_eq!(
            text,
            "# Dashboard\n[info] Please upload a file to proceed.\n"
        );
    }
}
