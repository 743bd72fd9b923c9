//! Command-line interface
//!
//! - parse: expand selector files and print each selector
//! - query: generate (and optionally save) one query per selector

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{parse, query, run_command, selectors_from_files};
pub use config::{BatchMode, Config};
pub use errors::{CliError, CliResult};
pub use io::{build_filename, selector_filename, strip_special_chars, write_response, ResourceType};

use crate::observability::init_logging;

/// Parse arguments, set up logging, run the requested command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose, cli.log_format);
    run_command(&cli.command, &cli.config)
}
