//! Manifest validation logic

use super::error::ValidationError;
use crate::config::schema::{ScheduleKindSpec, ScheduleSpec};
use crate::optim::CyclicalConfig;

/// Validate a schedule manifest
///
/// Checks:
/// - The parameter name is present
/// - The event is a completion event
/// - Values are finite and cycle parameters are in range
/// - Concat sequences are non-empty and flat
pub fn validate_spec(spec: &ScheduleSpec) -> Result<(), ValidationError> {
    if spec.param_name.trim().is_empty() {
        return Err(ValidationError::EmptyParamName);
    }

    if !spec.event.is_bindable() {
        return Err(ValidationError::UnbindableEvent(spec.event));
    }

    match &spec.schedule {
        ScheduleKindSpec::Concat { sequence } => {
            if sequence.is_empty() {
                return Err(ValidationError::EmptySequence);
            }
            for (index, entry) in sequence.iter().enumerate() {
                let config = entry.schedule.cyclical().ok_or(ValidationError::NestedConcat(index))?;
                validate_cyclical(config)
                    .map_err(|e| ValidationError::InvalidEntry { index, source: Box::new(e) })?;
            }
            Ok(())
        }
        single => match single.cyclical() {
            Some(config) => validate_cyclical(config),
            None => Ok(()),
        },
    }
}

fn validate_cyclical(config: &CyclicalConfig) -> Result<(), ValidationError> {
    for (field, value) in [("start_value", config.start_value), ("end_value", config.end_value)] {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field, value });
        }
    }

    if !config.cycle_size.is_finite() || config.cycle_size <= 0.0 {
        return Err(ValidationError::InvalidCycleSize(config.cycle_size));
    }

    if !config.cycle_mult.is_finite() || config.cycle_mult < 1.0 {
        return Err(ValidationError::InvalidCycleMult(config.cycle_mult));
    }

    Ok(())
}
