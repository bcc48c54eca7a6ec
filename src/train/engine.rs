//! Minimal event-driven control loop
//!
//! The engine owns the run state and a registry of handlers. It emits
//! lifecycle events around a user-supplied step function; schedules and
//! monitors subscribe to those events.

use super::callback::{CallbackManager, Event, EventHandler};
use super::state::{EngineState, Output};
use crate::error::Result;

/// Event-driven training loop
pub struct Engine {
    callbacks: CallbackManager,
    state: EngineState,
}

impl Engine {
    /// Create an engine with empty state and no handlers
    pub fn new() -> Self {
        Self { callbacks: CallbackManager::new(), state: EngineState::new() }
    }

    /// Subscribe `handler` to `event`
    pub fn add_event_handler<H: EventHandler + 'static>(&mut self, event: Event, handler: H) {
        self.callbacks.add(event, handler);
    }

    /// Subscribe an already boxed handler
    pub fn add_boxed_handler(&mut self, event: Event, handler: Box<dyn EventHandler>) {
        self.callbacks.add_boxed(event, handler);
    }

    /// Number of handlers subscribed to `event`
    pub fn handler_count(&self, event: Event) -> usize {
        self.callbacks.count_for(event)
    }

    /// Current run state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Mutable run state
    pub fn state_mut(&mut self) -> &mut EngineState {
        &mut self.state
    }

    /// Consume the engine, keeping its state
    pub fn into_state(self) -> EngineState {
        self.state
    }

    /// Fire a single event outside of `run`
    pub fn fire(&mut self, event: Event) -> Result<()> {
        self.callbacks.fire(event, &mut self.state)
    }

    /// Run `max_epochs` epochs of `epoch_length` iterations each.
    ///
    /// `step` is called once per iteration and its return value becomes
    /// `state.output` before `IterationCompleted` fires. Iteration counts are
    /// global across epochs. Any handler or step error aborts the run.
    pub fn run<F>(&mut self, max_epochs: usize, epoch_length: usize, mut step: F) -> Result<&EngineState>
    where
        F: FnMut(&EngineState) -> Result<Output>,
    {
        self.state.max_epochs = max_epochs;
        self.state.epoch_length = epoch_length;
        tracing::debug!(max_epochs, epoch_length, "engine run started");

        self.fire(Event::Started)?;
        'epochs: while self.state.epoch < max_epochs {
            self.state.epoch += 1;
            self.fire(Event::EpochStarted)?;

            for _ in 0..epoch_length {
                self.state.iteration += 1;
                self.fire(Event::IterationStarted)?;
                let output = step(&self.state)?;
                self.state.output = Some(output);
                self.fire(Event::IterationCompleted)?;

                if self.state.should_terminate() {
                    tracing::debug!(iteration = self.state.iteration, "termination requested");
                    break 'epochs;
                }
            }

            self.fire(Event::EpochCompleted)?;
            if self.state.should_terminate() {
                break;
            }
        }
        self.fire(Event::Completed)?;

        tracing::debug!(
            epoch = self.state.epoch,
            iteration = self.state.iteration,
            "engine run completed"
        );
        Ok(&self.state)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
