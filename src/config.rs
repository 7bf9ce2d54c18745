use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::chart::ChartKind;

pub const DEFAULT_TITLE: &str = "My Organized Dashboard";
pub const DEFAULT_THEME: &str = "plotly_white";

/// Presentation settings read from an optional YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub title: String,
    pub theme: String,
    pub default_chart: ChartKind,
    /// Rows printed in the table view (0 = all).
    pub max_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            default_chart: ChartKind::Bar,
            max_rows: 0,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("Parsing dashboard config YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Opening config file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Loading config from {path:?}"))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
