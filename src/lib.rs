pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod filter;
pub mod frame;
pub mod io_utils;
pub mod loader;
pub mod missing;
pub mod session;
pub mod stats;
pub mod table;
pub mod transform;
pub mod view;

use std::{
    env, fs,
    io::{self, BufRead, Write},
    path::Path,
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, SessionLine, SourceArgs},
    config::DashboardConfig,
    frame::Table,
    loader::LoadOptions,
    session::{Inputs, SessionState},
    view::View,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tabular_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => handle_render(&args),
        Commands::Session(args) => handle_session(&args),
    }
}

fn handle_render(args: &cli::RenderArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let source = load_source(&args.source)?;
    let state = SessionState::new(&config);
    let inputs = args.interaction.to_inputs();
    let (view, _) = session::render(&state, source.as_ref(), &inputs, &config)
        .context("Rendering dashboard")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    present(&mut out, &view, &config, args.chart_output.as_deref())
}

fn handle_session(args: &cli::SessionArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let source = load_source(&args.source)?;
    let mut state = SessionState::new(&config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.with_context(|| format!("Reading interaction {}", line_no + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed, "quit" | "exit") {
            break;
        }
        match parse_interaction(trimmed) {
            Ok(inputs) => match session::render(&state, source.as_ref(), &inputs, &config) {
                Ok((view, next)) => {
                    state = next;
                    present(&mut out, &view, &config, None)?;
                }
                Err(err) => report(&mut out, line_no + 1, &err.to_string())?,
            },
            Err(message) => report(&mut out, line_no + 1, &message)?,
        }
    }
    info!("Session ended with chart kind {}", state.chart_kind);
    Ok(())
}

fn parse_interaction(line: &str) -> std::result::Result<Inputs, String> {
    let args = cli::split_line(line)?;
    let parsed = SessionLine::try_parse_from(args).map_err(|err| err.to_string())?;
    Ok(parsed.interaction.to_inputs())
}

fn report(out: &mut impl Write, line_no: usize, message: &str) -> Result<()> {
    warn!("Interaction {line_no} failed");
    writeln!(out, "error: {}", message.trim_end())?;
    Ok(())
}

fn load_config(source: &SourceArgs) -> Result<DashboardConfig> {
    let config = DashboardConfig::load_or_default(source.config.as_deref())?;
    debug!("Dashboard config: {config:?}");
    Ok(config)
}

/// Loads the uploaded file; `None` when no file was given.
fn load_source(source: &SourceArgs) -> Result<Option<Table>> {
    let Some(path) = &source.input else {
        return Ok(None);
    };
    let (bytes, name) = io_utils::read_upload(path)?;
    let options = LoadOptions {
        delimiter: source
            .delimiter
            .unwrap_or(io_utils::DEFAULT_CSV_DELIMITER),
        encoding: io_utils::resolve_encoding(source.input_encoding.as_deref())?,
    };
    let table = loader::load_table(&bytes, &name, &options)
        .with_context(|| format!("Loading {path:?}"))?;
    Ok(Some(table))
}

fn present(
    out: &mut impl Write,
    view: &View,
    config: &DashboardConfig,
    chart_output: Option<&Path>,
) -> Result<()> {
    out.write_all(view::render_text(view, config.max_rows).as_bytes())?;
    if let Some(chart) = &view.chart {
        let json = chart.to_json().context("Serializing chart specification")?;
        match chart_output {
            Some(path) => {
                fs::write(path, json)
                    .with_context(|| format!("Writing chart specification to {path:?}"))?;
                info!("Chart specification written to {path:?}");
            }
            None => writeln!(out, "{json}")?,
        }
    }
    out.flush()?;
    Ok(())
}
