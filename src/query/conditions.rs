//! Predicate build context
//!
//! Predicates fall into four groups. Entries within a group are OR-ed;
//! groups are AND-ed. Duplicate address inputs are dropped with a warning.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::observability::Event;
use crate::selector::{Metric, MetricSelection, MlabProject};

/// Direction code of a server-to-client transfer
pub const DIRECTION_S2C: u8 = 1;
/// Direction code of a client-to-server transfer
pub const DIRECTION_C2S: u8 = 0;

/// Inclusive `(start, end)` range of integer IPv4 addresses
pub type IpBlock = (u64, u64);

/// Predicates collected for one query, before assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditionals {
    pub data_direction: Option<String>,
    pub log_time: BTreeSet<String>,
    pub server_ip: Vec<String>,
    pub client_network_block: Vec<String>,
}

impl Conditionals {
    /// Collects all predicate groups for one selector
    pub fn build(
        metric: MetricSelection,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        project: &MlabProject,
        server_ips: &[String],
        client_ip_blocks: &[IpBlock],
    ) -> Self {
        let is_web100 = project.is_web100();
        Self {
            data_direction: data_direction_condition(metric),
            log_time: BTreeSet::from([log_time_condition(start_time, end_time, is_web100)]),
            server_ip: server_ip_conditions(server_ips, is_web100),
            client_network_block: client_network_block_conditions(client_ip_blocks, is_web100),
        }
    }
}

fn direction_for(metric: Metric) -> Option<u8> {
    match metric {
        Metric::DownloadThroughput
        | Metric::MinimumRtt
        | Metric::AverageRtt
        | Metric::PacketRetransmitRate => Some(DIRECTION_S2C),
        Metric::UploadThroughput => Some(DIRECTION_C2S),
        Metric::HopCount => None,
    }
}

/// Direction predicate, if the metric has a direction
pub fn data_direction_condition(metric: MetricSelection) -> Option<String> {
    match metric {
        MetricSelection::One(metric) => direction_for(metric)
            .map(|code| format!("connection_spec.data_direction == {}", code)),
        MetricSelection::All => None,
    }
}

/// Half-open `[start, end)` predicate in epoch seconds
pub fn log_time_condition(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    is_web100: bool,
) -> String {
    let field = if is_web100 {
        "web100_log_entry.log_time"
    } else {
        "log_time"
    };
    format!(
        "({field} >= {start}) AND ({field} < {end})",
        field = field,
        start = start_time.timestamp(),
        end = end_time.timestamp()
    )
}

/// One range predicate per unique block, ordered by block start
pub fn client_network_block_conditions(blocks: &[IpBlock], is_web100: bool) -> Vec<String> {
    let unique: BTreeSet<IpBlock> = blocks.iter().copied().collect();
    if unique.len() != blocks.len() {
        warn!(
            event = %Event::DuplicateClientBlocks,
            supplied = blocks.len(),
            unique = unique.len(),
            "Client IP blocks contained duplicates."
        );
    }

    let field = if is_web100 {
        "web100_log_entry.connection_spec.remote_ip"
    } else {
        "connection_spec.client_ip"
    };
    unique
        .into_iter()
        .map(|(start, end)| format!("PARSE_IP({}) BETWEEN {} AND {}", field, start, end))
        .collect()
}

/// One equality predicate per unique server IP, sorted lexicographically
pub fn server_ip_conditions(server_ips: &[String], is_web100: bool) -> Vec<String> {
    let unique: BTreeSet<&str> = server_ips.iter().map(String::as_str).collect();
    if unique.len() != server_ips.len() {
        warn!(
            event = %Event::DuplicateServerIps,
            supplied = server_ips.len(),
            unique = unique.len(),
            "Server IPs contained duplicates."
        );
    }

    let field = if is_web100 {
        "web100_log_entry.connection_spec.local_ip"
    } else {
        "connection_spec.server_ip"
    };
    unique
        .into_iter()
        .map(|ip| format!("{} = '{}'", field, ip))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[derive(Clone)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<T, F: FnOnce() -> T>(f: F) -> (T, String) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = LogBuffer(buf.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.lock().expect("log buffer lock").clone();
        (result, String::from_utf8_lossy(&bytes).to_string())
    }

    #[test]
    fn test_direction_codes() {
        let upload = data_direction_condition(MetricSelection::One(Metric::UploadThroughput));
        assert_eq!(upload.as_deref(), Some("connection_spec.data_direction == 0"));

        for metric in [
            Metric::DownloadThroughput,
            Metric::MinimumRtt,
            Metric::AverageRtt,
            Metric::PacketRetransmitRate,
        ] {
            assert_eq!(
                data_direction_condition(MetricSelection::One(metric)).as_deref(),
                Some("connection_spec.data_direction == 1")
            );
        }

        assert_eq!(data_direction_condition(MetricSelection::One(Metric::HopCount)), None);
        assert_eq!(data_direction_condition(MetricSelection::All), None);
    }

    #[test]
    fn test_log_time_field_follows_schema() {
        let start = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2014, 1, 2, 0, 0, 0).unwrap();

        assert_eq!(
            log_time_condition(start, end, true),
            "(web100_log_entry.log_time >= 1388534400) AND (web100_log_entry.log_time < 1388620800)"
        );
        assert_eq!(
            log_time_condition(start, end, false),
            "(log_time >= 1388534400) AND (log_time < 1388620800)"
        );
    }

    #[test]
    fn test_client_blocks_sorted_and_deduplicated() {
        let blocks = [(300, 400), (100, 200), (300, 400)];
        let (conditions, logs) = capture_logs(|| client_network_block_conditions(&blocks, true));

        assert_eq!(
            conditions,
            vec![
                "PARSE_IP(web100_log_entry.connection_spec.remote_ip) BETWEEN 100 AND 200",
                "PARSE_IP(web100_log_entry.connection_spec.remote_ip) BETWEEN 300 AND 400",
            ]
        );
        assert!(logs.contains("WARN"));
        assert!(logs.contains("DUPLICATE_CLIENT_BLOCKS"));
    }

    #[test]
    fn test_server_ips_sorted_and_deduplicated() {
        let ips: Vec<String> = ["10.0.0.2", "10.0.0.1", "10.0.0.2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (conditions, logs) = capture_logs(|| server_ip_conditions(&ips, false));

        assert_eq!(
            conditions,
            vec![
                "connection_spec.server_ip = '10.0.0.1'",
                "connection_spec.server_ip = '10.0.0.2'",
            ]
        );
        assert!(logs.contains("DUPLICATE_SERVER_IPS"));
    }

    #[test]
    fn test_no_warning_without_duplicates() {
        let ips = vec!["10.0.0.1".to_string()];
        let (_, logs) = capture_logs(|| server_ip_conditions(&ips, true));
        assert!(!logs.contains("WARN"));
    }
}
