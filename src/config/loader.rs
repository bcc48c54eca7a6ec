//! Entry points for YAML schedule manifests

use super::schema::ScheduleSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};
use crate::optim::{ParamGroups, ParamScheduler};
use std::fs;
use std::path::Path;

/// Read and parse a manifest without validating it
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<ScheduleSpec> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read config file {}", path.display()), e))?;
    parse_spec(&yaml)
}

/// Parse a manifest from YAML text
pub fn parse_spec(yaml: &str) -> Result<ScheduleSpec> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load, validate and build a schedule over `target`
///
/// # Example
///
/// ```no_run
/// use ritmo::config::schedule_from_yaml;
/// use ritmo::optim::ParamGroups;
///
/// let target = ParamGroups::single("lr", 0.1);
/// let schedule = schedule_from_yaml("schedule.yaml", target)?;
/// println!("{}", schedule.name());
/// # Ok::<(), ritmo::Error>(())
/// ```
pub fn schedule_from_yaml<P: AsRef<Path>>(path: P, target: ParamGroups) -> Result<Box<dyn ParamScheduler>> {
    let spec = load_spec(path)?;
    validate_spec(&spec).map_err(|e| Error::config(format!("Invalid config: {e}")))?;
    tracing::debug!(param = %spec.param_name, kind = spec.schedule.kind(), "manifest loaded");
    spec.build(target)
}
