//! The render cycle.
//!
//! [`render`] is a pure function of the session state, the loaded source
//! table, and the selections made for this interaction. The chart kind is
//! the only selection that outlives a render; everything else is recomputed
//! from the source each time.

use log::debug;
use thiserror::Error;

use crate::{
    chart::{self, ChartError, ChartKind, ChartOutcome, ChartRequest},
    config::DashboardConfig,
    frame::Table,
    transform::{self, OperationRequest, TransformError},
    view::{Notice, View},
};

pub const UPLOAD_PROMPT: &str = "Please upload a file to proceed.";

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub chart_kind: ChartKind,
}

impl SessionState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            chart_kind: config.default_chart,
        }
    }
}

/// Selections made for one interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    pub operation: OperationRequest,
    /// `None` keeps the chart kind from the session state.
    pub chart_kind: Option<ChartKind>,
    pub chart: ChartRequest,
}

pub fn render(
    state: &SessionState,
    source: Option<&Table>,
    inputs: &Inputs,
    config: &DashboardConfig,
) -> Result<(View, SessionState), RenderError> {
    let next_state = SessionState {
        chart_kind: inputs.chart_kind.unwrap_or(state.chart_kind),
    };
    let Some(source) = source else {
        return Ok((View::halted(&config.title, Notice::info(UPLOAD_PROMPT)), next_state));
    };

    let operation = inputs.operation.resolve(source)?;
    let transformed = transform::apply(&operation, source)?;
    let mut notices = transformed.notices;

    debug!(
        "Binding {} over {} column(s)",
        next_state.chart_kind,
        transformed.table.column_count()
    );
    let chart = match chart::build_chart(
        next_state.chart_kind,
        &transformed.table,
        &inputs.chart,
        &config.theme,
    )? {
        ChartOutcome::Chart(spec) => Some(spec),
        ChartOutcome::Warning(message) => {
            notices.push(Notice::warning(message));
            None
        }
    };

    let view = View {
        title: config.title.clone(),
        operation: Some(inputs.operation.kind.label()),
        table: Some(transformed.table),
        notices,
        chart,
    };
    Ok((view, next_state))
}
