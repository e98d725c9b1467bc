//! CLI configuration
//!
//! A single JSON object:
//!
//! ```json
//! {
//!   "schema_path": "./schema.json",
//!   "projection_path": "./schema.projected.json",
//!   "partition_count": 4,
//!   "log_level": "info",
//!   "pretty": false
//! }
//! ```
//!
//! Only `schema_path` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Severity};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema file (required)
    pub schema_path: String,

    /// Projection output file (optional, default `<schema_path>.projected.json`)
    #[serde(default)]
    pub projection_path: Option<String>,

    /// Partition count written by `init` (optional, default 1)
    #[serde(default = "default_partition_count")]
    pub partition_count: usize,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Indent the schema file (optional, default false)
    #[serde(default)]
    pub pretty: bool,
}

fn default_partition_count() -> usize {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json_str(&content)?;

        let path_text = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("config", path_text.as_str()),
                ("schema_path", config.schema_path.as_str()),
            ],
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_json_str(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_path.trim().is_empty() {
            return Err(CliError::config_error("schema_path must not be empty"));
        }

        if self.partition_count == 0 {
            return Err(CliError::config_error("partition_count must be > 0"));
        }

        self.severity()?;

        if matches!(&self.projection_path, Some(path) if path.trim().is_empty()) {
            return Err(CliError::config_error("projection_path must not be empty"));
        }

        Ok(())
    }

    /// Log level as a severity
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Schema file path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_path)
    }

    /// Projection output path
    pub fn projection_path(&self) -> PathBuf {
        match &self.projection_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!("{}.projected.json", self.schema_path)),
        }
    }
}
