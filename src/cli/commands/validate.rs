//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, validate_spec, ScheduleKindSpec, ScheduleSpec, ValidateArgs};
use crate::optim::CyclicalConfig;

/// Format one cyclical schedule as a single line
pub fn format_cyclical(kind: &str, config: &CyclicalConfig) -> String {
    let mut line = format!(
        "{kind}: {} -> {}, cycle size {}",
        config.start_value, config.end_value, config.cycle_size
    );
    if config.cycle_mult != 1.0 {
        line.push_str(&format!(", cycle mult {}", config.cycle_mult));
    }
    line
}

/// Format the schedule definition as a string
pub fn format_schedule_info(schedule: &ScheduleKindSpec) -> String {
    match schedule {
        ScheduleKindSpec::Concat { sequence } => {
            let mut lines = vec![format!("  Schedule: concat ({} entries)", sequence.len())];
            for (index, entry) in sequence.iter().enumerate() {
                let body = match entry.schedule.cyclical() {
                    Some(config) => format_cyclical(entry.schedule.kind(), config),
                    None => entry.schedule.kind().to_string(),
                };
                let duration = match entry.duration {
                    Some(d) => format!("{} invocations", d + 1),
                    None => "unbounded".to_string(),
                };
                lines.push(format!("    [{index}] {body} ({duration})"));
            }
            lines.join("\n")
        }
        single => match single.cyclical() {
            Some(config) => format!("  Schedule: {}", format_cyclical(single.kind(), config)),
            None => format!("  Schedule: {}", single.kind()),
        },
    }
}

/// Print detailed manifest summary
pub fn print_detailed_summary(spec: &ScheduleSpec) {
    println!();
    println!("Configuration Summary:");
    println!("  Parameter: {}", spec.param_name);
    println!("  Event: {}", spec.event);
    println!("  Save history: {}", spec.save_history);
    println!("{}", format_schedule_info(&spec.schedule));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let spec = load_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;

    validate_spec(&spec).map_err(|e| format!("Validation failed: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed && level != LogLevel::Quiet {
        print_detailed_summary(&spec);
    }

    Ok(())
}
