//! Configuration file
//!
//! Optional JSON file; every field has a default and a missing file means
//! all defaults. Command-line flags override what is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, info};

use crate::observability::Event;

use super::errors::{CliError, CliResult};

/// When to submit a query in batch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// Batch every query
    All,
    /// Batch queries reading more than `max_tables_without_batch` shards
    #[default]
    Automatic,
    /// Never batch
    None,
}

impl BatchMode {
    pub fn should_batch(&self, table_span: usize, max_tables_without_batch: usize) -> bool {
        match self {
            BatchMode::All => true,
            BatchMode::Automatic => table_span > max_tables_without_batch,
            BatchMode::None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory for saved query files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Write each generated query to a .sql file
    #[serde(default = "default_save_query")]
    pub save_query: bool,

    #[serde(default)]
    pub batch_mode: BatchMode,

    /// Largest shard count still run without batching in automatic mode
    #[serde(default = "default_max_tables_without_batch")]
    pub max_tables_without_batch: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("processed/")
}
fn default_save_query() -> bool {
    true
}
fn default_max_tables_without_batch() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            save_query: default_save_query(),
            batch_mode: BatchMode::default(),
            max_tables_without_batch: default_max_tables_without_batch(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults if it does not exist
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        let config = Self::from_json(&content)?;

        info!(event = %Event::ConfigLoaded, path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_tables_without_batch == 0 {
            return Err(CliError::config_error("max_tables_without_batch must be > 0"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("output_dir must not be empty"));
        }
        Ok(())
    }

    /// Whether a query over `table_span` shards should be batched
    pub fn should_batch(&self, table_span: usize) -> bool {
        self.batch_mode
            .should_batch(table_span, self.max_tables_without_batch)
    }
}
