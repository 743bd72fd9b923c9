//! Field tables for the select list
//!
//! Each metric maps to a fixed list of columns. The baseline columns are
//! always selected.

use std::collections::BTreeSet;

use crate::selector::{Metric, MetricSelection};

use super::errors::{QueryError, QueryResult};

/// Columns present in every select list
pub const BASELINE_FIELDS: [&str; 3] = [
    "web100_log_entry.log_time",
    "connection_spec.data_direction",
    "web100_log_entry.snap.State",
];

const S2C_FIELDS: [&str; 5] = [
    "web100_log_entry.snap.HCThruOctetsAcked",
    "web100_log_entry.snap.SndLimTimeRwin",
    "web100_log_entry.snap.SndLimTimeCwnd",
    "web100_log_entry.snap.SndLimTimeSnd",
    "web100_log_entry.snap.CongSignals",
];

const C2S_FIELDS: [&str; 2] = [
    "web100_log_entry.snap.HCThruOctetsReceived",
    "web100_log_entry.snap.Duration",
];

const MIN_RTT_FIELDS: [&str; 2] = [
    "web100_log_entry.snap.MinRTT",
    "web100_log_entry.snap.CountRTT",
];

const AVG_RTT_FIELDS: [&str; 2] = [
    "web100_log_entry.snap.SumRTT",
    "web100_log_entry.snap.CountRTT",
];

const RETRANSMIT_FIELDS: [&str; 2] = [
    "web100_log_entry.snap.SegsRetrans",
    "web100_log_entry.snap.DataSegsOut",
];

const HOP_COUNT_FIELDS: [&str; 6] = [
    "test_id",
    "paris_traceroute_hop.dest_ip",
    "paris_traceroute_hop.src_ip",
    "connection_spec.client_ip",
    "connection_spec.server_ip",
    "log_time",
];

/// Columns a metric needs, excluding the baseline
pub fn metric_fields(metric: Metric) -> Vec<&'static str> {
    let mut fields = Vec::new();
    match metric {
        Metric::UploadThroughput => fields.extend(C2S_FIELDS),
        Metric::DownloadThroughput => fields.extend(S2C_FIELDS),
        Metric::MinimumRtt => {
            fields.extend(MIN_RTT_FIELDS);
            fields.extend(S2C_FIELDS);
        }
        Metric::AverageRtt => {
            fields.extend(AVG_RTT_FIELDS);
            fields.extend(S2C_FIELDS);
        }
        Metric::PacketRetransmitRate => {
            fields.extend(RETRANSMIT_FIELDS);
            fields.extend(S2C_FIELDS);
        }
        Metric::HopCount => fields.extend(HOP_COUNT_FIELDS),
    }
    fields
}

/// Builds the sorted, deduplicated select list for a metric name.
///
/// `all` selects the union of every metric's columns.
pub fn build_select_list(metric: &str) -> QueryResult<Vec<String>> {
    let selection: MetricSelection = metric
        .parse()
        .map_err(|_| QueryError::unsupported_metric(metric))?;

    let mut fields: BTreeSet<&'static str> = BASELINE_FIELDS.iter().copied().collect();
    for metric in selection.metrics() {
        fields.extend(metric_fields(metric));
    }

    Ok(fields.into_iter().map(str::to_string).collect())
}
