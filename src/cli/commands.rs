//! CLI command implementations
//!
//! A selector file that fails to parse, or a selector whose query cannot be
//! built, is logged and skipped; the remaining work continues. Only a
//! server resolution failure stops the run.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{error, info};

use crate::observability::Event;
use crate::query::{generate_query, AddressResolver, QueryErrorCode, StaticAddresses};
use crate::selector::{Selector, SelectorFileParser};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_text, selector_filename, write_query_file, write_response, ResourceType};

/// Dispatch a parsed command, writing results to stdout
pub fn run_command(command: &Command, config_path: &Path) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Parse { files } => parse(files, &mut out),
        Command::Query {
            files,
            addresses,
            output,
            batchmode,
            no_save_query,
        } => {
            let mut config = Config::load(config_path)?;
            if let Some(dir) = output {
                config.output_dir = dir.clone();
            }
            if let Some(mode) = batchmode {
                config.batch_mode = *mode;
            }
            if *no_save_query {
                config.save_query = false;
            }

            let resolver = StaticAddresses::from_json(&read_text(addresses)?)?;
            query(files, &resolver, &config, &mut out)
        }
    }
}

/// Parses every file, skipping (and logging) the ones that fail
pub fn selectors_from_files(files: &[PathBuf]) -> Vec<(PathBuf, Selector)> {
    let parser = SelectorFileParser::new();
    let mut selectors = Vec::new();

    for file in files {
        let parsed = read_text(file).and_then(|text| Ok(parser.parse(&text)?));
        match parsed {
            Ok(parsed) => selectors.extend(parsed.into_iter().map(|s| (file.clone(), s))),
            Err(e) => {
                error!(
                    event = %Event::SelectorRejected,
                    file = %file.display(),
                    code = e.code(),
                    "Failed to parse selector file: {}",
                    e
                );
            }
        }
    }

    selectors
}

/// Prints each expanded selector
pub fn parse<W: Write>(files: &[PathBuf], out: &mut W) -> CliResult<()> {
    for (file, selector) in selectors_from_files(files) {
        let mut data = selector.to_json();
        data["file"] = json!(file.display().to_string());
        write_response(out, data)?;
    }
    Ok(())
}

/// Generates, optionally saves, and prints one query per selector
pub fn query<R: AddressResolver + ?Sized, W: Write>(
    files: &[PathBuf],
    resolver: &R,
    config: &Config,
    out: &mut W,
) -> CliResult<()> {
    for (file, selector) in selectors_from_files(files) {
        let (query, table_span) = match generate_query(&selector, resolver) {
            Ok(generated) => generated,
            Err(e) if e.code() == QueryErrorCode::ServerResolutionFailed => {
                return Err(CliError::Query(e));
            }
            Err(e) => {
                error!(
                    event = %Event::QueryRejected,
                    selector = %selector,
                    code = e.code().code(),
                    "Failed to generate queries: {}",
                    e
                );
                continue;
            }
        };

        let batched = config.should_batch(table_span);
        if batched {
            info!(
                event = %Event::QueryBatched,
                table_span,
                max_tables_without_batch = config.max_tables_without_batch,
                "query will run in batch mode"
            );
        }

        let saved_to = if config.save_query {
            let path = selector_filename(ResourceType::BigQuery, &config.output_dir, &selector);
            write_query_file(&path, &query)?;
            info!(event = %Event::QuerySaved, path = %path.display(), "saved query");
            Some(path.display().to_string())
        } else {
            None
        };

        write_response(
            out,
            json!({
                "file": file.display().to_string(),
                "metric": selector.metric.as_str(),
                "site": selector.site_name,
                "client_provider": selector.client_provider,
                "table_span": table_span,
                "batched": batched,
                "saved_to": saved_to,
                "query": query,
            }),
        )?;
    }
    Ok(())
}
