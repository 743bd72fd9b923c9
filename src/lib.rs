//! telescope - selector files in, measurement-lab BigQuery SQL out
//!
//! A selector file names a time window, a metric, and one or more
//! (site, client provider) pairs. The `selector` module validates and
//! expands it; the `query` module turns each selector plus its resolved
//! addresses into a deterministic query.

pub mod cli;
pub mod observability;
pub mod query;
pub mod selector;
