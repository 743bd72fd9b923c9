//! Query generation subsystem
//!
//! Builds one deterministic query string per selector:
//!
//! ```text
//! SELECT <sorted fields> FROM <monthly shard tables> WHERE <predicates>
//! ```
//!
//! - Shard tables: one per calendar month touched by `[start, end)`
//! - Fields: baseline columns plus the metric's fixed column list
//! - Predicates: schema guards, data direction, log time, server IPs,
//!   client network blocks
//!
//! Same inputs always produce the same text.

mod conditions;
mod errors;
mod fields;
mod generator;
mod resolve;
mod tables;

pub use conditions::{
    client_network_block_conditions, data_direction_condition, log_time_condition,
    server_ip_conditions, Conditionals, IpBlock, DIRECTION_C2S, DIRECTION_S2C,
};
pub use errors::{QueryError, QueryErrorCode, QueryResult};
pub use fields::{build_select_list, metric_fields, BASELINE_FIELDS};
pub use generator::{
    assemble, guard_conditions, QueryGenerator, QueryParts, NDT_PROJECT_CODE,
    PARIS_TRACEROUTE_PROJECT_CODE,
};
pub use resolve::{generate_query, AddressResolver, ResolvedAddresses, StaticAddresses};
pub use tables::{build_table_list, month_shards, shard_id, shard_table_name, DATABASE_NAME};
