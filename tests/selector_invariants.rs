//! Selector Invariant Tests
//!
//! Tests for selector file parsing through the public API:
//! - Expansion yields one selector per (subset × metric), subsets outermost
//! - Two subsets must differ in exactly one field
//! - Validation failures carry a stable error code
//! - Parsing is deterministic

use telescope::selector::{
    duration_to_string, Metric, MlabProject, SelectorErrorCode, SelectorFileParser,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn selector_doc(metric: &str, subsets: Value) -> String {
    json!({
        "file_format_version": 1,
        "duration": "30d",
        "metric": metric,
        "ip_translation": {"strategy": "maxmind", "params": {"db_snapshots": ["2014-08-04"]}},
        "subsets": subsets
    })
    .to_string()
}

fn subset(start_time: &str, client_provider: &str, site: &str) -> Value {
    json!({"start_time": start_time, "client_provider": client_provider, "site": site})
}

fn error_code(text: &str) -> SelectorErrorCode {
    SelectorFileParser::new().parse(text).unwrap_err().code()
}

// =============================================================================
// Expansion Tests
// =============================================================================

/// A single subset with one metric yields exactly one selector.
#[test]
fn test_single_subset_single_metric() {
    let text = selector_doc(
        "download_throughput",
        json!([subset("2014-02-01T00:00:00Z", "comcast", "iad01")]),
    );
    let selectors = SelectorFileParser::new().parse(&text).unwrap();

    assert_eq!(selectors.len(), 1);
    let selector = &selectors[0];
    assert_eq!(selector.start_time, Utc.with_ymd_and_hms(2014, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(selector.duration, 30 * 86400);
    assert_eq!(selector.metric, Metric::DownloadThroughput);
    assert_eq!(selector.site_name, "iad01");
    assert_eq!(selector.client_provider, "comcast");
    assert_eq!(selector.ip_translation_spec.strategy_name, "maxmind");
    assert_eq!(selector.mlab_project(), MlabProject::Ndt);
}

/// `all` over two subsets yields twelve selectors, grouped by subset.
#[test]
fn test_all_metrics_two_subsets() {
    let text = selector_doc(
        "all",
        json!([
            subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
            subset("2014-02-01T00:00:00Z", "comcast", "lga01"),
        ]),
    );
    let selectors = SelectorFileParser::new().parse(&text).unwrap();

    assert_eq!(selectors.len(), 2 * Metric::ALL.len());
    let (first, second) = selectors.split_at(Metric::ALL.len());
    assert!(first.iter().all(|s| s.site_name == "iad01"));
    assert!(second.iter().all(|s| s.site_name == "lga01"));

    let metrics: Vec<Metric> = first.iter().map(|s| s.metric).collect();
    assert_eq!(metrics, Metric::ALL.to_vec());
}

/// Hop count selectors target the traceroute schema.
#[test]
fn test_hop_count_uses_traceroute_project() {
    let text = selector_doc(
        "hop_count",
        json!([subset("2014-02-01T00:00:00Z", "comcast", "iad01")]),
    );
    let selectors = SelectorFileParser::new().parse(&text).unwrap();
    assert_eq!(selectors[0].mlab_project(), MlabProject::ParisTraceroute);
}

/// End time is start plus duration.
#[test]
fn test_end_time() {
    let text = selector_doc(
        "average_rtt",
        json!([subset("2014-02-01T00:00:00Z", "comcast", "iad01")]),
    );
    let selector = &SelectorFileParser::new().parse(&text).unwrap()[0];
    assert_eq!(
        selector.end_time().unwrap(),
        Utc.with_ymd_and_hms(2014, 3, 3, 0, 0, 0).unwrap()
    );
    assert_eq!(duration_to_string(selector.duration), "30d");
}

// =============================================================================
// Independent Variable Tests
// =============================================================================

/// Identical subsets have no independent variable.
#[test]
fn test_identical_subsets_rejected() {
    let text = selector_doc(
        "minimum_rtt",
        json!([
            subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
            subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
        ]),
    );
    assert_eq!(error_code(&text), SelectorErrorCode::NoIndependentVariable);
}

/// Subsets differing in two fields are incomparable.
#[test]
fn test_two_differences_rejected() {
    let text = selector_doc(
        "minimum_rtt",
        json!([
            subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
            subset("2014-03-01T00:00:00Z", "verizon", "iad01"),
        ]),
    );
    assert_eq!(error_code(&text), SelectorErrorCode::IncomparableSets);
}

/// Varying only the start time is allowed.
#[test]
fn test_start_time_as_independent_variable() {
    let text = selector_doc(
        "upload_throughput",
        json!([
            subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
            subset("2014-03-01T00:00:00Z", "comcast", "iad01"),
        ]),
    );
    let selectors = SelectorFileParser::new().parse(&text).unwrap();
    assert_eq!(selectors.len(), 2);
    assert!(selectors[0].start_time < selectors[1].start_time);
}

// =============================================================================
// Validation Error Tests
// =============================================================================

/// Each malformed document fails with its documented code.
#[test]
fn test_error_codes() {
    let one = json!([subset("2014-02-01T00:00:00Z", "comcast", "iad01")]);

    assert_eq!(error_code("not json"), SelectorErrorCode::MalformedInput);

    let mut doc: Value = serde_json::from_str(&selector_doc("hop_count", one.clone())).unwrap();
    doc["file_format_version"] = json!(4);
    assert_eq!(
        error_code(&doc.to_string()),
        SelectorErrorCode::UnsupportedSelectorVersion
    );

    assert_eq!(
        error_code(&selector_doc("jitter", one.clone())),
        SelectorErrorCode::UnsupportedMetric
    );

    assert_eq!(
        error_code(&selector_doc("hop_count", json!([]))),
        SelectorErrorCode::UnsupportedSubsetSize
    );

    assert_eq!(
        error_code(&selector_doc(
            "hop_count",
            json!([
                subset("2014-02-01T00:00:00Z", "comcast", "iad01"),
                subset("2014-02-01T00:00:00Z", "comcast", "lga01"),
                subset("2014-02-01T00:00:00Z", "comcast", "sea01"),
            ])
        )),
        SelectorErrorCode::UnsupportedSubsetSize
    );

    let mut doc: Value = serde_json::from_str(&selector_doc("hop_count", one.clone())).unwrap();
    doc["duration"] = json!(30);
    assert_eq!(error_code(&doc.to_string()), SelectorErrorCode::UnsupportedDuration);

    assert_eq!(
        error_code(&selector_doc("hop_count", json!({"site": "iad01"}))),
        SelectorErrorCode::UnsupportedSubsets
    );

    assert_eq!(
        error_code(&selector_doc(
            "hop_count",
            json!([{"start_time": "2014-02-01T00:00:00Z", "site": "iad01"}])
        )),
        SelectorErrorCode::UnsupportedSubsetDefinition
    );

    assert_eq!(
        error_code(&selector_doc(
            "hop_count",
            json!([subset("2014-02-01 00:00:00", "comcast", "iad01")])
        )),
        SelectorErrorCode::UnsupportedSubsetDateFormat
    );

    let mut doc: Value = serde_json::from_str(&selector_doc("hop_count", one.clone())).unwrap();
    doc["duration"] = json!("3w");
    assert_eq!(
        error_code(&doc.to_string()),
        SelectorErrorCode::UnsupportedSelectorDurationType
    );

    let mut doc: Value = serde_json::from_str(&selector_doc("hop_count", one)).unwrap();
    doc["ip_translation"] = json!({"strategy": "maxmind"});
    assert_eq!(
        error_code(&doc.to_string()),
        SelectorErrorCode::MissingIpTranslationField
    );
}

/// A duration that runs past the representable date range is rejected
/// instead of being cut short.
#[test]
fn test_oversized_window_rejected() {
    let mut doc: Value = serde_json::from_str(&selector_doc(
        "download_throughput",
        json!([subset("2014-01-01T00:00:00Z", "comcast", "iad01")]),
    ))
    .unwrap();
    doc["duration"] = json!("99999999999d");

    let err = SelectorFileParser::new().parse(&doc.to_string()).unwrap_err();
    assert_eq!(err.code(), SelectorErrorCode::UnsupportedSelectorDuration);
    assert_eq!(err.field(), Some("duration"));
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// The same text parses to the same selectors every time.
#[test]
fn test_parsing_is_deterministic() {
    let text = selector_doc(
        "all",
        json!([subset("2014-02-01T00:00:00Z", "comcast", "iad01")]),
    );
    let parser = SelectorFileParser::new();
    let first = parser.parse(&text).unwrap();

    for _ in 0..50 {
        assert_eq!(parser.parse(&text).unwrap(), first);
    }
}
