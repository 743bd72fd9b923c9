//! Selector file parser
//!
//! Validation happens once, at entry, and yields a `SelectorInput` whose
//! structure is known to be sound. Expansion then produces one `Selector`
//! per (subset × metric) pair.
//!
//! Validation order (first failure wins):
//! 1. `file_format_version` present, integer, within range
//! 2. `duration` present and a string
//! 3. `metric` present, a string, `all` or a supported metric
//! 4. `subsets` present and a list, of length 1 or 2
//! 5. each subset has exactly `start_time`, `client_provider`, `site`
//! 6. with two subsets, exactly one field differs
//! 7. `ip_translation` present with `strategy` and `params`

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::observability::Event;

use super::duration::parse_duration;
use super::errors::{SelectorError, SelectorResult};
use super::types::{
    window_end, IpTranslationSpec, MetricSelection, Selector, Subset, SubsetField,
};

/// Oldest selector file format accepted
pub const MIN_FILE_FORMAT_VERSION: u64 = 1;
/// Newest selector file format accepted
pub const MAX_FILE_FORMAT_VERSION: u64 = 3;

const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A selector file that passed structural validation
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorInput {
    pub file_format_version: u64,
    pub duration: String,
    pub metric: MetricSelection,
    pub ip_translation: IpTranslationSpec,
    pub subsets: Vec<Subset>,
}

/// Parser for selector files.
///
/// Holds no state; one instance may parse any number of files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectorFileParser;

impl SelectorFileParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses selector text into selectors, one per (subset × metric).
    ///
    /// Subsets are the outer loop, so with two subsets the first half of
    /// the result belongs to the first subset.
    pub fn parse(&self, text: &str) -> SelectorResult<Vec<Selector>> {
        let document: Value =
            serde_json::from_str(text).map_err(SelectorError::malformed_input)?;
        let input = self.validate_selector_input(&document)?;
        let selectors = self.expand(&input)?;

        debug!(
            event = %Event::SelectorParsed,
            selectors = selectors.len(),
            subsets = input.subsets.len(),
            "parsed selector file"
        );
        Ok(selectors)
    }

    fn expand(&self, input: &SelectorInput) -> SelectorResult<Vec<Selector>> {
        let duration = parse_duration(&input.duration)?;
        let metrics = input.metric.metrics();

        let mut selectors = Vec::with_capacity(input.subsets.len() * metrics.len());
        for subset in &input.subsets {
            let start_time = self.parse_start_time(&subset.start_time)?;
            window_end(start_time, duration)?;
            for metric in &metrics {
                selectors.push(Selector {
                    start_time,
                    duration,
                    metric: *metric,
                    ip_translation_spec: input.ip_translation.clone(),
                    client_provider: subset.client_provider.clone(),
                    site_name: subset.site.clone(),
                });
            }
        }

        Ok(selectors)
    }

    /// Checks the structure of a selector document.
    pub fn validate_selector_input(&self, document: &Value) -> SelectorResult<SelectorInput> {
        let obj = document
            .as_object()
            .ok_or_else(|| SelectorError::unsupported_version("Selector must be a JSON object"))?;

        let file_format_version = validate_version(obj)?;

        let duration = match obj.get("duration") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(SelectorError::unsupported_duration(format!(
                    "duration must be a string, got {}",
                    json_type_name(other)
                )))
            }
            None => return Err(SelectorError::unsupported_duration("duration is required")),
        };

        let metric = match obj.get("metric") {
            Some(Value::String(s)) => s.parse::<MetricSelection>()?,
            Some(other) => return Err(SelectorError::unsupported_metric(other)),
            None => return Err(SelectorError::unsupported_metric("(missing)")),
        };

        let raw_subsets = match obj.get("subsets") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SelectorError::unsupported_subsets(format!(
                    "subsets must be a list, got {}",
                    json_type_name(other)
                )))
            }
            None => return Err(SelectorError::unsupported_subsets("subsets is required")),
        };
        if raw_subsets.is_empty() || raw_subsets.len() > 2 {
            return Err(SelectorError::unsupported_subset_size(raw_subsets.len()));
        }

        let subsets = raw_subsets
            .iter()
            .map(validate_subset)
            .collect::<SelectorResult<Vec<_>>>()?;

        if let [first, second] = subsets.as_slice() {
            let field = self.find_independent_variable(first, second)?;
            debug!(
                event = %Event::IndependentVariableFound,
                field = field.as_str(),
                "subsets vary in one field"
            );
        }

        let ip_translation = obj
            .get("ip_translation")
            .ok_or_else(|| SelectorError::missing_ip_translation_field("ip_translation"))
            .and_then(|value| self.parse_ip_translation(value))?;

        Ok(SelectorInput {
            file_format_version,
            duration,
            metric,
            ip_translation,
            subsets,
        })
    }

    /// Parses a strict `YYYY-MM-DDTHH:MM:SSZ` timestamp as UTC.
    pub fn parse_start_time(&self, value: &str) -> SelectorResult<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(value, START_TIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| SelectorError::unsupported_date_format(value))
    }

    /// Parses a duration shorthand into seconds.
    pub fn parse_duration(&self, value: &str) -> SelectorResult<u64> {
        parse_duration(value)
    }

    /// Reads the `ip_translation` object. Both `strategy` and `params` are
    /// required; the error names whichever is missing.
    pub fn parse_ip_translation(&self, value: &Value) -> SelectorResult<IpTranslationSpec> {
        let obj = value
            .as_object()
            .ok_or_else(|| SelectorError::missing_ip_translation_field("strategy"))?;

        let strategy_name = obj
            .get("strategy")
            .and_then(Value::as_str)
            .ok_or_else(|| SelectorError::missing_ip_translation_field("strategy"))?;
        let params = obj
            .get("params")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| SelectorError::missing_ip_translation_field("params"))?;

        Ok(IpTranslationSpec {
            strategy_name: strategy_name.to_string(),
            params,
        })
    }

    /// Returns the single field that differs between two subsets.
    ///
    /// # Errors
    ///
    /// - `NoIndependentVariable` if the subsets are identical
    /// - `IncomparableSets` if more than one field differs
    pub fn find_independent_variable(
        &self,
        first: &Subset,
        second: &Subset,
    ) -> SelectorResult<SubsetField> {
        let mut independent: Option<SubsetField> = None;

        for field in SubsetField::ALL {
            if first.get(field) == second.get(field) {
                continue;
            }
            if let Some(previous) = independent {
                return Err(SelectorError::incomparable_sets(
                    previous.as_str(),
                    field.as_str(),
                ));
            }
            independent = Some(field);
        }

        independent.ok_or_else(SelectorError::no_independent_variable)
    }
}

fn validate_version(obj: &Map<String, Value>) -> SelectorResult<u64> {
    let raw = obj
        .get("file_format_version")
        .ok_or_else(|| SelectorError::unsupported_version("file_format_version is required"))?;
    // Integral floats such as `2.0` count as their integer value.
    let version = raw
        .as_u64()
        .or_else(|| {
            raw.as_f64()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64)
                .map(|v| v as u64)
        })
        .ok_or_else(|| {
            SelectorError::unsupported_version("file_format_version must be a whole number")
        })?;

    if !(MIN_FILE_FORMAT_VERSION..=MAX_FILE_FORMAT_VERSION).contains(&version) {
        return Err(SelectorError::unsupported_version(format!(
            "file_format_version {} outside {}..={}",
            version, MIN_FILE_FORMAT_VERSION, MAX_FILE_FORMAT_VERSION
        )));
    }
    Ok(version)
}

fn validate_subset(value: &Value) -> SelectorResult<Subset> {
    let obj = value
        .as_object()
        .ok_or_else(|| SelectorError::unsupported_subset_definition("Subset must be an object"))?;

    let expected: BTreeSet<&str> = SubsetField::ALL.iter().map(SubsetField::as_str).collect();
    let actual: BTreeSet<&str> = obj.keys().map(String::as_str).collect();
    if actual != expected {
        return Err(SelectorError::unsupported_subset_definition(format!(
            "Subset keys {:?} must be exactly {:?}",
            actual, expected
        )));
    }

    let text = |field: SubsetField| -> SelectorResult<String> {
        obj.get(field.as_str())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SelectorError::unsupported_subset_definition(format!(
                    "Subset field '{}' must be a string",
                    field
                ))
            })
    };

    Ok(Subset {
        start_time: text(SubsetField::StartTime)?,
        client_provider: text(SubsetField::ClientProvider)?,
        site: text(SubsetField::Site)?,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
