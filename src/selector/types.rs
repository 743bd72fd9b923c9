//! Selector domain types
//!
//! The metric → schema mapping is a compiled-in constant. A selector never
//! stores its project separately from its metric.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::duration::duration_to_string;
use super::errors::{SelectorError, SelectorResult};

/// Metrics that can be requested from the measurement store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HopCount,
    DownloadThroughput,
    UploadThroughput,
    MinimumRtt,
    AverageRtt,
    PacketRetransmitRate,
}

impl Metric {
    /// Every supported metric, in expansion order for `all`
    pub const ALL: [Metric; 6] = [
        Metric::HopCount,
        Metric::DownloadThroughput,
        Metric::UploadThroughput,
        Metric::MinimumRtt,
        Metric::AverageRtt,
        Metric::PacketRetransmitRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HopCount => "hop_count",
            Metric::DownloadThroughput => "download_throughput",
            Metric::UploadThroughput => "upload_throughput",
            Metric::MinimumRtt => "minimum_rtt",
            Metric::AverageRtt => "average_rtt",
            Metric::PacketRetransmitRate => "packet_retransmit_rate",
        }
    }

    /// Schema variant holding this metric's data
    pub fn mlab_project(&self) -> MlabProject {
        match self {
            Metric::HopCount => MlabProject::ParisTraceroute,
            _ => MlabProject::Ndt,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = SelectorError;

    fn from_str(s: &str) -> SelectorResult<Self> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| SelectorError::unsupported_metric(s))
    }
}

/// A metric as written in a selector file: one metric or `all`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSelection {
    All,
    One(Metric),
}

impl MetricSelection {
    /// Metrics this selection expands to
    pub fn metrics(&self) -> Vec<Metric> {
        match self {
            MetricSelection::All => Metric::ALL.to_vec(),
            MetricSelection::One(metric) => vec![*metric],
        }
    }
}

impl FromStr for MetricSelection {
    type Err = SelectorError;

    fn from_str(s: &str) -> SelectorResult<Self> {
        if s == "all" {
            return Ok(MetricSelection::All);
        }
        s.parse().map(MetricSelection::One)
    }
}

/// Schema variant of the measurement tables
///
/// `Ndt` rows carry web100 instrumentation; `ParisTraceroute` rows use the
/// bare schema. Any other project name uses web100 field names but adds no
/// guard predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MlabProject {
    Ndt,
    ParisTraceroute,
    Other(String),
}

impl MlabProject {
    pub fn as_str(&self) -> &str {
        match self {
            MlabProject::Ndt => "ndt",
            MlabProject::ParisTraceroute => "paris_traceroute",
            MlabProject::Other(name) => name,
        }
    }

    /// Whether rows of this project use web100 field names
    pub fn is_web100(&self) -> bool {
        !matches!(self, MlabProject::ParisTraceroute)
    }
}

impl From<&str> for MlabProject {
    fn from(s: &str) -> Self {
        match s {
            "ndt" => MlabProject::Ndt,
            "paris_traceroute" => MlabProject::ParisTraceroute,
            other => MlabProject::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MlabProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque description of how to translate a client provider into IP blocks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpTranslationSpec {
    pub strategy_name: String,
    pub params: Map<String, Value>,
}

/// Fields of a subset tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsetField {
    StartTime,
    ClientProvider,
    Site,
}

impl SubsetField {
    /// Comparison order for independent-variable detection
    pub const ALL: [SubsetField; 3] = [
        SubsetField::StartTime,
        SubsetField::ClientProvider,
        SubsetField::Site,
    ];

    /// Key of this field in the selector file
    pub fn as_str(&self) -> &'static str {
        match self {
            SubsetField::StartTime => "start_time",
            SubsetField::ClientProvider => "client_provider",
            SubsetField::Site => "site",
        }
    }
}

impl fmt::Display for SubsetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(start_time, client_provider, site)` tuple as written in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    pub start_time: String,
    pub client_provider: String,
    pub site: String,
}

impl Subset {
    pub fn get(&self, field: SubsetField) -> &str {
        match field {
            SubsetField::StartTime => &self.start_time,
            SubsetField::ClientProvider => &self.client_provider,
            SubsetField::Site => &self.site,
        }
    }
}

/// `start_time + duration`, or an error if it cannot be represented
pub fn window_end(start_time: DateTime<Utc>, duration: u64) -> SelectorResult<DateTime<Utc>> {
    i64::try_from(duration)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|span| start_time.checked_add_signed(span))
        .ok_or_else(|| {
            SelectorError::unsupported_selector_duration(format!(
                "Window of {}s from {} ends past the supported date range",
                duration,
                start_time.format("%Y-%m-%dT%H:%M:%SZ")
            ))
        })
}

/// One fully resolved dataset-selection request
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub start_time: DateTime<Utc>,
    /// Length of the window in seconds, always positive
    pub duration: u64,
    pub metric: Metric,
    pub ip_translation_spec: IpTranslationSpec,
    pub client_provider: String,
    pub site_name: String,
}

impl Selector {
    /// Schema variant, derived from the metric
    pub fn mlab_project(&self) -> MlabProject {
        self.metric.mlab_project()
    }

    /// Exclusive end of the selected window.
    ///
    /// Fails with `UnsupportedSelectorDuration` if the window runs past the
    /// representable date range.
    pub fn end_time(&self) -> SelectorResult<DateTime<Utc>> {
        window_end(self.start_time, self.duration)
    }

    /// Summary used by the CLI and in log fields
    pub fn to_json(&self) -> Value {
        json!({
            "start_time": self.start_time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "duration": self.duration,
            "duration_string": duration_to_string(self.duration),
            "metric": self.metric.as_str(),
            "mlab_project": self.mlab_project().as_str(),
            "client_provider": self.client_provider,
            "site": self.site_name,
            "ip_translation": self.ip_translation_spec,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Selector {} {} {} (duration: {})>",
            self.metric, self.site_name, self.client_provider, self.duration
        )
    }
}
