//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// ritmo: event-driven hyperparameter schedules
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ritmo")]
#[command(version)]
#[command(about = "Preview and validate cyclical and concatenated parameter schedules")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Simulate a schedule manifest and print the values it writes
    Preview(PreviewArgs),

    /// Validate a schedule manifest without running it
    Validate(ValidateArgs),
}

/// Arguments for the preview command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PreviewArgs {
    /// Path to YAML schedule manifest
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Number of invocations to simulate
    #[arg(short, long, default_value_t = 20)]
    pub events: usize,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML schedule manifest
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
