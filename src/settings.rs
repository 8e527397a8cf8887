//! Application configuration.
//!
//! Settings layer: struct defaults, overlaid by an optional config file,
//! overlaid by `STACKWATCH_*` environment variables. CLI flags are applied
//! on top by the binary.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Settings for the stackwatch binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the CMDB snapshot file.
    pub cmdb_file: String,
    /// Path to the trace span file.
    pub trace_file: String,
    /// Path to the alert feed file.
    pub alert_file: String,
    /// Root identifier for the dependency topology.
    pub root: String,
    /// Poll interval in seconds for watch mode.
    pub refresh_secs: u64,
    /// Alert/span correlation window in seconds.
    pub correlation_window_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cmdb_file: "cmdb.json".to_string(),
            trace_file: "traces.json".to_string(),
            alert_file: "alerts.json".to_string(),
            root: "web01".to_string(),
            refresh_secs: 1,
            correlation_window_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load settings from an optional file plus environment overrides.
    ///
    /// The file format is inferred from the extension (TOML, JSON, YAML).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("STACKWATCH").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
