//! File and stdout handling for the CLI
//!
//! - Output: one JSON object per line on stdout
//! - Saved queries: one .sql file per selector

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::selector::{duration_to_string, Selector};

use super::errors::CliResult;

/// Kind of artifact an output file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    /// Raw measurement rows
    Data,
    /// Generated query text
    BigQuery,
}

impl ResourceType {
    fn extension(&self) -> &'static str {
        match self {
            ResourceType::Data => "raw.csv",
            ResourceType::BigQuery => "bigquery.sql",
        }
    }
}

/// Drops every character outside `[A-Za-z0-9._+-]`
pub fn strip_special_chars(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
        .collect()
}

/// `{date}+{duration}_{site}_{client_provider}_{metric}-{extension}` under `outdir`
pub fn build_filename(
    resource_type: ResourceType,
    outdir: &Path,
    date: &str,
    duration: &str,
    site: &str,
    client_provider: &str,
    metric: &str,
) -> PathBuf {
    let filename = format!(
        "{}+{}_{}_{}_{}-{}",
        date,
        duration,
        site,
        client_provider,
        metric,
        resource_type.extension()
    );
    outdir.join(strip_special_chars(&filename))
}

/// Output file for one selector
pub fn selector_filename(
    resource_type: ResourceType,
    outdir: &Path,
    selector: &Selector,
) -> PathBuf {
    build_filename(
        resource_type,
        outdir,
        &selector.start_time.format("%Y-%m-%d-%H%M%S").to_string(),
        &duration_to_string(selector.duration),
        &selector.site_name,
        &selector.client_provider,
        selector.metric.as_str(),
    )
}

/// Writes query text, creating the parent directory if needed
pub fn write_query_file(path: &Path, query: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, query)?;
    Ok(())
}

pub fn read_text(path: &Path) -> CliResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Writes `{"status": "ok", "data": ...}` as one line
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;

    Ok(())
}
