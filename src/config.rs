//! Run configuration.
//!
//! A run is configured from an optional TOML file plus command-line
//! overrides. Every field has a default so a minimal file (or none at all)
//! is valid; the CLI layer merges its flags on top of whatever the file
//! provided.

use crate::logging::LogLevel;
use crate::model::{OUTLET_CODE, SegmentId};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Configuration for a drainage preparation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepConfig {
    /// Path to the segment table. Required by the pipeline; optional here
    /// so it can come from either the file or the CLI.
    pub segments_path: Option<String>,
    /// Path to the basin query list. When absent, every gauged segment in
    /// the table is queried.
    pub basins_path: Option<String>,
    /// Path of the output artifact.
    pub output_path: String,
    /// Write the mapping as JSON instead of key-value text.
    pub json_output: bool,
    /// Run the network invariant checks before traversal.
    pub verify: bool,
    /// Downstream-target codes meaning "flows out of the domain".
    pub terminal_codes: Vec<SegmentId>,
    /// Minimum log level: debug, info, warn, error.
    pub log_level: String,
    /// Optional file sink for log output.
    pub log_file: Option<String>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        PrepConfig {
            segments_path: None,
            basins_path: None,
            output_path: "upstream_segments.txt".to_string(),
            json_output: false,
            verify: false,
            terminal_codes: vec![OUTLET_CODE],
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Load a configuration file.
///
/// Unknown keys are rejected so a typo in a config file fails loudly
/// instead of silently falling back to a default.
pub fn load_config(path: &Path) -> Result<PrepConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: PrepConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Map a config/CLI log-level string to a `LogLevel`.
///
/// Unrecognized values fall back to `Info` rather than aborting the run.
pub fn parse_log_level(value: &str) -> LogLevel {
    match value.to_ascii_lowercase().as_str() {
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warning,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}
