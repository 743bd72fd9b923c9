//! Selector error types
//!
//! Every failure raised while reading a selector file is a permanent
//! validation error. The symbolic code is stable and is what the invoking
//! tool shows to the user:
//! - MalformedInput
//! - UnsupportedSelectorVersion
//! - UnsupportedDuration
//! - UnsupportedMetric
//! - UnsupportedSubsets
//! - UnsupportedSubsetSize
//! - UnsupportedSubsetDefinition
//! - IncomparableSets
//! - NoIndependentVariable
//! - UnsupportedSubsetDateFormat
//! - UnsupportedSelectorDurationType
//! - UnsupportedSelectorDuration
//! - MissingIpTranslationField

use std::fmt;

/// Selector-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorErrorCode {
    /// Selector text is not valid JSON
    MalformedInput,
    /// `file_format_version` missing or out of range
    UnsupportedSelectorVersion,
    /// `duration` missing or not a string
    UnsupportedDuration,
    /// `metric` missing, not a string, or unknown
    UnsupportedMetric,
    /// `subsets` missing or not a list
    UnsupportedSubsets,
    /// `subsets` has fewer than one or more than two entries
    UnsupportedSubsetSize,
    /// A subset does not have exactly the expected keys
    UnsupportedSubsetDefinition,
    /// Two subsets differ in more than one field
    IncomparableSets,
    /// Two subsets are identical
    NoIndependentVariable,
    /// `start_time` is not `YYYY-MM-DDTHH:MM:SSZ`
    UnsupportedSubsetDateFormat,
    /// A duration segment uses an unknown unit
    UnsupportedSelectorDurationType,
    /// No duration segments found
    UnsupportedSelectorDuration,
    /// `ip_translation` lacks a required field
    MissingIpTranslationField,
}

impl SelectorErrorCode {
    /// Returns the symbolic code string
    pub fn code(&self) -> &'static str {
        match self {
            SelectorErrorCode::MalformedInput => "MalformedInput",
            SelectorErrorCode::UnsupportedSelectorVersion => "UnsupportedSelectorVersion",
            SelectorErrorCode::UnsupportedDuration => "UnsupportedDuration",
            SelectorErrorCode::UnsupportedMetric => "UnsupportedMetric",
            SelectorErrorCode::UnsupportedSubsets => "UnsupportedSubsets",
            SelectorErrorCode::UnsupportedSubsetSize => "UnsupportedSubsetSize",
            SelectorErrorCode::UnsupportedSubsetDefinition => "UnsupportedSubsetDefinition",
            SelectorErrorCode::IncomparableSets => "IncomparableSets",
            SelectorErrorCode::NoIndependentVariable => "NoIndependentVariable",
            SelectorErrorCode::UnsupportedSubsetDateFormat => "UnsupportedSubsetDateFormat",
            SelectorErrorCode::UnsupportedSelectorDurationType => {
                "UnsupportedSelectorDurationType"
            }
            SelectorErrorCode::UnsupportedSelectorDuration => "UnsupportedSelectorDuration",
            SelectorErrorCode::MissingIpTranslationField => "MissingIpTranslationField",
        }
    }
}

impl fmt::Display for SelectorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Selector error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    code: SelectorErrorCode,
    message: String,
    field: Option<String>,
}

impl SelectorError {
    fn new(code: SelectorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn malformed_input(reason: impl fmt::Display) -> Self {
        Self::new(
            SelectorErrorCode::MalformedInput,
            format!("Selector is not valid JSON: {}", reason),
        )
    }

    pub fn unsupported_version(reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorCode::UnsupportedSelectorVersion, reason)
            .with_field("file_format_version")
    }

    pub fn unsupported_duration(reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorCode::UnsupportedDuration, reason).with_field("duration")
    }

    pub fn unsupported_metric(metric: impl fmt::Display) -> Self {
        Self::new(
            SelectorErrorCode::UnsupportedMetric,
            format!("Metric {} is not supported", metric),
        )
        .with_field("metric")
    }

    pub fn unsupported_subsets(reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorCode::UnsupportedSubsets, reason).with_field("subsets")
    }

    pub fn unsupported_subset_size(size: usize) -> Self {
        Self::new(
            SelectorErrorCode::UnsupportedSubsetSize,
            format!("Expected 1 or 2 subsets, found {}", size),
        )
        .with_field("subsets")
    }

    pub fn unsupported_subset_definition(reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorCode::UnsupportedSubsetDefinition, reason).with_field("subsets")
    }

    pub fn incomparable_sets(first: &str, second: &str) -> Self {
        Self::new(
            SelectorErrorCode::IncomparableSets,
            format!(
                "Subsets differ in both '{}' and '{}', only one field may vary",
                first, second
            ),
        )
    }

    pub fn no_independent_variable() -> Self {
        Self::new(
            SelectorErrorCode::NoIndependentVariable,
            "Subsets are identical, exactly one field must vary",
        )
    }

    pub fn unsupported_date_format(value: &str) -> Self {
        Self::new(
            SelectorErrorCode::UnsupportedSubsetDateFormat,
            format!("'{}' does not match YYYY-MM-DDTHH:MM:SSZ", value),
        )
        .with_field("start_time")
    }

    pub fn unsupported_duration_type(unit: &str) -> Self {
        Self::new(
            SelectorErrorCode::UnsupportedSelectorDurationType,
            format!("Unknown duration unit '{}'", unit),
        )
        .with_field("duration")
    }

    pub fn unsupported_selector_duration(reason: impl Into<String>) -> Self {
        Self::new(SelectorErrorCode::UnsupportedSelectorDuration, reason).with_field("duration")
    }

    pub fn missing_ip_translation_field(field: &str) -> Self {
        Self::new(
            SelectorErrorCode::MissingIpTranslationField,
            format!("Missing expected field in ip_translation dict: {}", field),
        )
        .with_field(field)
    }

    /// Returns the error code
    pub fn code(&self) -> SelectorErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field, if known
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SelectorError {}

/// Result type for selector operations
pub type SelectorResult<T> = Result<T, SelectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_symbolic() {
        assert_eq!(
            SelectorErrorCode::UnsupportedSelectorVersion.code(),
            "UnsupportedSelectorVersion"
        );
        assert_eq!(
            SelectorErrorCode::NoIndependentVariable.code(),
            "NoIndependentVariable"
        );
        assert_eq!(
            SelectorErrorCode::UnsupportedSelectorDurationType.code(),
            "UnsupportedSelectorDurationType"
        );
    }

    #[test]
    fn test_display_leads_with_code() {
        let err = SelectorError::unsupported_metric("jitter");
        let display = err.to_string();
        assert!(display.starts_with("UnsupportedMetric: "));
        assert!(display.contains("jitter"));
        assert_eq!(err.field(), Some("metric"));
    }

    #[test]
    fn test_missing_ip_translation_field_names_field() {
        let err = SelectorError::missing_ip_translation_field("params");
        assert_eq!(err.code(), SelectorErrorCode::MissingIpTranslationField);
        assert_eq!(err.field(), Some("params"));
        assert!(err.message().contains("params"));
    }
}
