//! Core traits and types for the event system
//!
//! This module provides the foundational types for engine handlers:
//! - `Event` - Lifecycle points a handler can subscribe to
//! - `EventHandler` - The trait all handlers implement

use crate::error::{Error, Result};
use crate::train::state::EngineState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle points emitted by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Run is about to start
    Started,
    /// Epoch is about to start
    EpochStarted,
    /// Iteration is about to start
    IterationStarted,
    /// Iteration step finished, output is available
    IterationCompleted,
    /// All iterations of an epoch finished
    EpochCompleted,
    /// Run finished
    Completed,
}

impl Event {
    /// All events in emission order
    pub const ALL: [Event; 6] = [
        Event::Started,
        Event::EpochStarted,
        Event::IterationStarted,
        Event::IterationCompleted,
        Event::EpochCompleted,
        Event::Completed,
    ];

    /// Name used in manifests and messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::Started => "started",
            Event::EpochStarted => "epoch_started",
            Event::IterationStarted => "iteration_started",
            Event::IterationCompleted => "iteration_completed",
            Event::EpochCompleted => "epoch_completed",
            Event::Completed => "completed",
        }
    }

    /// Whether schedules and monitors may bind to this event
    pub fn is_bindable(&self) -> bool {
        matches!(self, Event::IterationCompleted | Event::EpochCompleted)
    }

    /// Fail unless this is `IterationCompleted` or `EpochCompleted`
    pub fn ensure_bindable(self) -> Result<Self> {
        if self.is_bindable() {
            Ok(self)
        } else {
            Err(Error::config(format!(
                "cannot bind to '{self}': event must be '{}' or '{}'",
                Event::IterationCompleted,
                Event::EpochCompleted
            )))
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Event::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == s.to_lowercase())
            .ok_or_else(|| Error::config(format!("unknown event: {s}")))
    }
}

/// Trait for engine handlers
///
/// Handlers run synchronously, in registration order, and may mutate the
/// engine state. An error aborts the run and is returned from `Engine::run`.
pub trait EventHandler {
    /// Called each time the subscribed event fires
    fn handle(&mut self, state: &mut EngineState) -> Result<()>;

    /// Get handler name for logging
    fn name(&self) -> &'static str {
        "EventHandler"
    }
}

impl<F> EventHandler for F
where
    F: FnMut(&mut EngineState) -> Result<()>,
{
    fn handle(&mut self, state: &mut EngineState) -> Result<()> {
        self(state)
    }

    fn name(&self) -> &'static str {
        "closure"
    }
}
