//! ritmo CLI
//!
//! Preview and validate parameter schedule manifests.
//!
//! # Usage
//!
//! ```bash
//! # Print the first 20 values a manifest writes
//! ritmo preview schedule.yaml
//!
//! # Simulate 200 invocations, JSON output
//! ritmo preview schedule.yaml --events 200 --format json
//!
//! # Validate a manifest
//! ritmo validate schedule.yaml --detailed
//! ```

use clap::Parser;
use ritmo::cli::{run_command, setup_logging, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
