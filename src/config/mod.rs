//! Declarative schedule configuration
//!
//! - `schema` - YAML manifest types
//! - `validate` - manifest validation
//! - `cli` - command-line arguments

mod cli;
mod loader;
mod schema;
pub mod validate;

pub use cli::{parse_args, Cli, Command, OutputFormat, PreviewArgs, ValidateArgs};
pub use loader::{load_spec, parse_spec, schedule_from_yaml};
pub use schema::{EntrySpec, ScheduleKindSpec, ScheduleSpec};
pub use validate::{validate_spec, ValidationError};
