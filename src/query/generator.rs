//! Query generator
//!
//! Everything is computed in the constructor; the generator is immutable
//! afterwards. Accumulation (`Conditionals::build`) and formatting
//! (`assemble`) are separate steps so each can be checked on its own.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::observability::Event;
use crate::selector::{MetricSelection, MlabProject, Selector};

use super::conditions::{Conditionals, IpBlock};
use super::errors::{QueryError, QueryResult};
use super::fields::build_select_list;
use super::resolve::ResolvedAddresses;
use super::tables::build_table_list;

/// Columns that must be non-null in web100 rows
const WEB100_NON_NULL_FIELDS: [&str; 6] = [
    "connection_spec.data_direction",
    "web100_log_entry.is_last_entry",
    "web100_log_entry.snap.HCThruOctetsAcked",
    "web100_log_entry.snap.CongSignals",
    "web100_log_entry.connection_spec.remote_ip",
    "web100_log_entry.connection_spec.local_ip",
];

/// Tool discriminator of NDT rows
pub const NDT_PROJECT_CODE: u8 = 0;
/// Tool discriminator of Paris traceroute rows
pub const PARIS_TRACEROUTE_PROJECT_CODE: u8 = 3;

/// Inputs to the pure assembly step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParts {
    pub select_list: Vec<String>,
    pub table_list: Vec<String>,
    pub conditionals: Conditionals,
    pub project: MlabProject,
}

/// Fixed predicates that precede everything else for a schema variant
pub fn guard_conditions(project: &MlabProject) -> Vec<String> {
    match project {
        MlabProject::Ndt => WEB100_NON_NULL_FIELDS
            .iter()
            .map(|field| format!("{} IS NOT NULL", field))
            .chain([
                format!("project = {}", NDT_PROJECT_CODE),
                "web100_log_entry.is_last_entry = True".to_string(),
            ])
            .collect(),
        MlabProject::ParisTraceroute => {
            vec![format!("project = {}", PARIS_TRACEROUTE_PROJECT_CODE)]
        }
        MlabProject::Other(_) => Vec::new(),
    }
}

fn or_group<'a>(
    conditions: impl IntoIterator<Item = &'a String>,
    separator: &str,
) -> Option<String> {
    let joined = conditions
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator);
    (!joined.is_empty()).then(|| format!("({})", joined))
}

/// Formats the final query text.
///
/// Clause order: schema guards, data direction, log time, server IPs,
/// client network blocks. Empty groups are left out.
pub fn assemble(parts: &QueryParts) -> String {
    let conditionals = &parts.conditionals;

    let mut clauses = guard_conditions(&parts.project);
    clauses.extend(conditionals.data_direction.clone());
    clauses.extend(or_group(&conditionals.log_time, " OR\n\t"));
    clauses.extend(or_group(&conditionals.server_ip, " OR\n\t\t"));
    clauses.extend(or_group(&conditionals.client_network_block, " OR\n\t\t"));

    format!(
        "SELECT\n\t{}\nFROM\n\t{}\nWHERE\n\t{}",
        parts.select_list.join(",\n\t"),
        parts.table_list.join(",\n\t"),
        clauses.join("\n\tAND ")
    )
}

/// Builds the query for one selector's resolved inputs
#[derive(Debug, Clone)]
pub struct QueryGenerator {
    parts: QueryParts,
    query: String,
}

impl QueryGenerator {
    /// Builds the query.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMetric` if `metric` is neither `all` nor a known metric
    /// - `WrongConditionalValueType` if `end_time <= start_time`
    pub fn new(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        metric: &str,
        project: &MlabProject,
        server_ips: &[String],
        client_ip_blocks: &[IpBlock],
    ) -> QueryResult<Self> {
        let select_list = build_select_list(metric)?;
        let selection: MetricSelection = metric
            .parse()
            .map_err(|_| QueryError::unsupported_metric(metric))?;
        let table_list = build_table_list(start_time, end_time)?;
        let conditionals = Conditionals::build(
            selection,
            start_time,
            end_time,
            project,
            server_ips,
            client_ip_blocks,
        );

        let parts = QueryParts {
            select_list,
            table_list,
            conditionals,
            project: project.clone(),
        };
        let query = assemble(&parts);

        debug!(
            event = %Event::QueryGenerated,
            metric,
            project = project.as_str(),
            tables = parts.table_list.len(),
            "built query"
        );
        Ok(Self { parts, query })
    }

    /// Builds the query for a parsed selector and its resolved addresses.
    ///
    /// A window that runs past the representable date range is
    /// `WrongConditionalValueType`.
    pub fn for_selector(selector: &Selector, addresses: &ResolvedAddresses) -> QueryResult<Self> {
        let end_time = selector
            .end_time()
            .map_err(|e| QueryError::wrong_conditional_value_type(e.to_string()))?;
        Self::new(
            selector.start_time,
            end_time,
            selector.metric.as_str(),
            &selector.mlab_project(),
            &addresses.server_ips,
            &addresses.client_ip_blocks,
        )
    }

    /// The query text; identical on every call
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of shard tables the query reads
    pub fn table_span(&self) -> usize {
        self.parts.table_list.len()
    }

    pub fn select_list(&self) -> &[String] {
        &self.parts.select_list
    }

    pub fn table_list(&self) -> &[String] {
        &self.parts.table_list
    }

    pub fn conditionals(&self) -> &Conditionals {
        &self.parts.conditionals
    }
}
