//! Error types for schedule setup and invocation
//!
//! Setup-time problems surface as [`Error::Configuration`]; values that a
//! handler expects to find in the run state but does not surface as
//! [`Error::MissingData`]. Nothing here is retried.

use thiserror::Error;

/// Result type alias for ritmo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running a schedule.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid setup: bad event kind, bad cycle parameters, bad metric names.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A metric or output value expected in the engine state is absent.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Manifest (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a missing-data error.
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingData(message.into())
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Whether the caller must fix its setup before retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Serialization(_))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
