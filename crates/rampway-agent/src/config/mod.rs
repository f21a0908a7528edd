//! Configuration loading for the rampway binary.
//! Reads rampway.toml from the current directory or the path in RAMPWAY_CONFIG.
//! Files ending in `.yaml`, `.yml` or `.json` are read as a bare pipeline
//! config; `offline` is only available in TOML or on the command line.
//!
//! ```toml
//! offline = false
//!
//! [query]
//! endpoints = ["https://rampdb.nih.gov/api/pathways-from-analytes"]
//! timeout_secs = 10
//!
//! [resolver]
//! strategy = "static_table"
//! mapping_file = "names.tsv"
//!
//! [export]
//! output_dir = "reports"
//! formats = ["csv", "text", "pdf"]
//! ```

use std::path::Path;

use anyhow::Context;
use rampway_common::{ExportFormat, PipelineConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_CONFIG_FILE: &str = "rampway.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Use the built-in demonstration pathways instead of the RaMP service.
    #[serde(default)]
    pub offline: bool,

    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}


/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub offline: bool,
    pub endpoints: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub formats: Vec<ExportFormat>,
    pub output_dir: Option<String>,
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        let file = path.to_string_lossy();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_pipeline(PipelineConfig::from_yaml(&file)),
            Some("json") => Self::from_pipeline(PipelineConfig::from_json(&file)),
            _ => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml_str(&content)
            }
        }
        .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(
            path = %path.display(),
            endpoints = config.pipeline.query.endpoints.len(),
            strategy = ?config.pipeline.resolver.strategy,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn from_pipeline(pipeline: anyhow::Result<PipelineConfig>) -> anyhow::Result<Self> {
        Ok(Self { offline: false, pipeline: pipeline? })
    }

    pub fn apply(&mut self, overrides: Overrides) {
        self.offline |= overrides.offline;
        if !overrides.endpoints.is_empty() {
            self.pipeline.query.endpoints = overrides.endpoints;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.pipeline.query.timeout_secs = secs;
        }
        if !overrides.formats.is_empty() {
            self.pipeline.export.formats = overrides.formats;
        }
        if let Some(dir) = overrides.output_dir {
            self.pipeline.export.output_dir = dir;
        }
    }
}
