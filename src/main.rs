//! telescope CLI entry point
//!
//! Argument parsing, logging setup and dispatch all live in `cli::run`.

use telescope::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
