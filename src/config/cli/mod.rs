//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! ritmo preview schedule.yaml --events 50
//! ritmo preview schedule.yaml --format json
//! ritmo validate schedule.yaml --detailed
//! ```

mod core;
mod types;

pub use core::{parse_args, Cli, Command, PreviewArgs, ValidateArgs};
pub use types::OutputFormat;
