//! Validation error types

use crate::train::Event;

/// Validation error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter name cannot be empty")]
    EmptyParamName,

    #[error("Invalid event: {0} (must be iteration_completed or epoch_completed)")]
    UnbindableEvent(Event),

    #[error("Invalid {field}: {value} (must be finite)")]
    NonFiniteValue { field: &'static str, value: f64 },

    #[error("Invalid cycle size: {0} (must be > 0)")]
    InvalidCycleSize(f64),

    #[error("Invalid cycle multiplier: {0} (must be >= 1.0)")]
    InvalidCycleMult(f64),

    #[error("Concat sequence cannot be empty")]
    EmptySequence,

    #[error("Concat entry {0} is itself a concat schedule")]
    NestedConcat(usize),

    #[error("Concat entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}
