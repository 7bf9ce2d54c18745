use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    chart::{ChartKind, ChartRequest},
    missing::MissingMethod,
    session::Inputs,
    transform::{OperationKind, OperationRequest},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean, summarize, and chart CSV or XLSX tables",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single render: load, transform, bind a chart, and print the view
    Render(RenderArgs),
    /// Load a file once and render one interaction per stdin line
    Session(SessionArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Uploaded .csv or .xlsx file
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// YAML file with dashboard settings (title, theme, default_chart, max_rows)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub interaction: InteractionArgs,
    /// Write the chart specification JSON here instead of stdout
    #[arg(long = "chart-output")]
    pub chart_output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Widget selections for one render cycle.
#[derive(Debug, Clone, Default, Args)]
pub struct InteractionArgs {
    /// Operation to apply to the loaded table
    #[arg(long = "operation", value_enum, default_value_t = OperationKind::MissingData)]
    pub operation: OperationKind,
    /// How to handle missing data
    #[arg(long = "method", value_enum)]
    pub method: Option<MissingMethod>,
    /// Column for group filtering or renaming (defaults to the first column)
    #[arg(long = "column")]
    pub column: Option<String>,
    /// Group value to keep (defaults to the first value seen)
    #[arg(long = "value")]
    pub value: Option<String>,
    /// New name for the renamed column
    #[arg(long = "new-name")]
    pub new_name: Option<String>,
    /// Chart type (keeps the previous choice when omitted)
    #[arg(long = "chart", value_enum)]
    pub chart: Option<ChartKind>,
    /// X-axis column
    #[arg(long = "x")]
    pub x: Option<String>,
    /// Y-axis column
    #[arg(long = "y")]
    pub y: Option<String>,
    /// Categorical column to colour by ("None" for no grouping)
    #[arg(long = "color")]
    pub color: Option<String>,
    /// Pie chart label column
    #[arg(long = "names")]
    pub names: Option<String>,
    /// Pie chart value column
    #[arg(long = "values")]
    pub values: Option<String>,
}

impl InteractionArgs {
    pub fn to_inputs(&self) -> Inputs {
        Inputs {
            operation: OperationRequest {
                kind: self.operation,
                method: self.method,
                column: self.column.clone(),
                value: self.value.clone(),
                new_name: self.new_name.clone(),
            },
            chart_kind: self.chart,
            chart: ChartRequest {
                x: self.x.clone(),
                y: self.y.clone(),
                color: self.color.clone(),
                names: self.names.clone(),
                values: self.values.clone(),
            },
        }
    }
}

/// One line of a `session` transcript.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(flatten)]
    pub interaction: InteractionArgs,
}

/// Splits a session line into arguments; quotes group words.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_arg = false;
    for ch in line.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_arg = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(format!("Unterminated {q} quote"));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
