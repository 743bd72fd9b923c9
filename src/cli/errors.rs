//! CLI error types
//!
//! Wraps subsystem errors so `main` can print one line and exit non-zero.

use std::io;

use thiserror::Error;

use crate::query::QueryError;
use crate::selector::SelectorError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file unreadable or invalid
    #[error("ConfigError: {0}")]
    Config(String),

    /// Filesystem or stdout failure
    #[error("IoError: {0}")]
    Io(#[from] io::Error),

    /// JSON input or output failure
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Selector(#[from] SelectorError),

    #[error("{0}")]
    Query(#[from] QueryError),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Symbolic code of the underlying failure
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "ConfigError",
            CliError::Io(_) => "IoError",
            CliError::Json(_) => "JsonError",
            CliError::Selector(e) => e.code().code(),
            CliError::Query(e) => e.code().code(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
