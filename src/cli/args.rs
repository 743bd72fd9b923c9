//! CLI argument definitions using clap
//!
//! Commands:
//! - telescope parse <selector files...>
//! - telescope query <selector files...> --addresses <json>

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;

use super::config::BatchMode;

/// Telescope - turns selector files into measurement-lab queries
#[derive(Parser, Debug)]
#[command(name = "telescope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: json or text
    #[arg(long, default_value = "json", global = true)]
    pub log_format: LogFormat,

    /// Path to configuration file
    #[arg(long, default_value = "./telescope.json", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse selector files and print the expanded selectors
    Parse {
        /// Selector JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate one query per selector
    Query {
        /// Selector JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSON file with resolved server_ips and client_ip_blocks
        #[arg(long)]
        addresses: PathBuf,

        /// Directory for saved .sql files (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Batch mode policy (overrides config)
        #[arg(long, value_enum)]
        batchmode: Option<BatchMode>,

        /// Do not write .sql files
        #[arg(long)]
        no_save_query: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
