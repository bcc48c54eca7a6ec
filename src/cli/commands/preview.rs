//! Preview command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, OutputFormat, PreviewArgs, ScheduleSpec};
use crate::error::Result;
use crate::optim::{simulate, ScheduleRegistry};
use serde::Serialize;

/// One simulated invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    pub event: usize,
    pub value: f64,
}

/// Simulate `spec` for `events` invocations on a scratch parameter group
pub fn preview_spec(spec: &ScheduleSpec, events: usize) -> Result<Vec<PreviewRow>> {
    let registry = ScheduleRegistry::default();
    let values = simulate(&spec.param_name, events, |ctx| spec.schedule.build_in(&ctx, &registry))?;
    Ok(values.into_iter().map(|(event, value)| PreviewRow { event, value }).collect())
}

/// Render preview rows as a table or JSON
pub fn format_preview(spec: &ScheduleSpec, rows: &[PreviewRow], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Text => {
            let mut lines = vec![
                format!("{} ({}, on {})", spec.param_name, spec.schedule.kind(), spec.event),
                format!("{:>6}  {:>12}", "event", "value"),
            ];
            lines.extend(rows.iter().map(|row| format!("{:>6}  {:>12.6}", row.event, row.value)));
            Ok(lines.join("\n"))
        }
    }
}

pub fn run_preview(args: PreviewArgs, level: LogLevel) -> std::result::Result<(), String> {
    log(level, LogLevel::Verbose, &format!("Loading manifest: {}", args.config.display()));

    let spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;
    validate_spec(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    let rows = preview_spec(&spec, args.events).map_err(|e| format!("Preview failed: {e}"))?;
    let output = format_preview(&spec, &rows, args.format).map_err(|e| e.to_string())?;

    match args.format {
        // Machine-readable output is printed even with --quiet
        OutputFormat::Json => println!("{output}"),
        OutputFormat::Text => log(level, LogLevel::Normal, &output),
    }
    Ok(())
}
