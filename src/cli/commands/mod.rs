//! CLI command implementations

mod preview;
mod validate;


use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Preview(args) => preview::run_preview(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}
