//! Dashboard configuration loaded from an optional JSON file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MARKS_DASHBOARD_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "marks_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub histogram_bins: usize,
    pub pivot_decimals: u32,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Where bundles are written; `None` asks with a save dialog.
    pub export_dir: Option<PathBuf>,
    pub open_after_export: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 10,
            pivot_decimals: 1,
            chart_width: 1000,
            chart_height: 700,
            export_dir: None,
            open_after_export: true,
            window_width: 1400.0,
            window_height: 800.0,
        }
    }
}

impl DashboardConfig {
    /// Parse a config from JSON. Unknown fields are ignored and missing
    /// ones take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Config file path: `$MARKS_DASHBOARD_CONFIG`, else the default file name.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from the resolved path; a broken file is logged and ignored.
    pub fn load_or_default() -> Self {
        let path = Self::resolve_path();
        match Self::load(&path) {
            Ok(config) => {
                log::debug!("Using config {:?}", config);
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        self.histogram_bins = self.histogram_bins.max(1);
        self.chart_width = self.chart_width.max(200);
        self.chart_height = self.chart_height.max(150);
        self
    }
}
