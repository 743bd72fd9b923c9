//! Query generation error types
//!
//! Error codes:
//! - UnsupportedMetric
//! - WrongConditionalValueType
//! - NoClientNetworkBlocksFound
//! - ServerResolutionFailed

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Metric has no field table
    UnsupportedMetric,
    /// Time bounds do not form a non-empty range
    WrongConditionalValueType,
    /// Resolver found no client network blocks
    NoClientNetworkBlocksFound,
    /// Resolver could not produce server addresses
    ServerResolutionFailed,
}

impl QueryErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::UnsupportedMetric => "UnsupportedMetric",
            QueryErrorCode::WrongConditionalValueType => "WrongConditionalValueType",
            QueryErrorCode::NoClientNetworkBlocksFound => "NoClientNetworkBlocksFound",
            QueryErrorCode::ServerResolutionFailed => "ServerResolutionFailed",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query generation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
}

impl QueryError {
    pub fn unsupported_metric(metric: &str) -> Self {
        Self {
            code: QueryErrorCode::UnsupportedMetric,
            message: format!("Metric '{}' is not supported", metric),
        }
    }

    pub fn wrong_conditional_value_type(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::WrongConditionalValueType,
            message: reason.into(),
        }
    }

    pub fn no_client_network_blocks(client_provider: &str) -> Self {
        Self {
            code: QueryErrorCode::NoClientNetworkBlocksFound,
            message: format!(
                "Could not find IP blocks associated with client provider {}",
                client_provider
            ),
        }
    }

    pub fn server_resolution_failed(reason: impl fmt::Display) -> Self {
        Self {
            code: QueryErrorCode::ServerResolutionFailed,
            message: format!("Failed to resolve M-Lab server IPs: {}", reason),
        }
    }

    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for QueryError {}

/// Result type for query generation
pub type QueryResult<T> = Result<T, QueryError>;
