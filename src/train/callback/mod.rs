//! Event system for the training engine
//!
//! Provides hooks for engine lifecycle events:
//! - `started` / `completed`
//! - `epoch_started` / `epoch_completed`
//! - `iteration_started` / `iteration_completed`
//!
//! Parameter schedules and metric monitors bind to one of the two
//! completion events; arbitrary closures can subscribe to any event.
//!
//! # Example
//!
//! ```rust
//! use ritmo::train::{Engine, EngineState, Event, Output};
//!
//! let mut engine = Engine::new();
//! engine.add_event_handler(Event::EpochCompleted, |state: &mut EngineState| -> ritmo::Result<()> {
//!     println!("Epoch {} finished", state.epoch);
//!     Ok(())
//! });
//! engine.run(2, 10, |_| Ok(Output::Scalar(0.0)))?;
//! # Ok::<(), ritmo::Error>(())
//! ```

mod manager;
mod monitor;
mod scheduler;
mod traits;

// Re-export all public types
pub use manager::CallbackManager;
pub use monitor::{
    MemorySink, MetricMonitor, MetricRecord, MetricSink, OutputTransform, StateCounter, StepSource,
};
pub use scheduler::{attach_scheduler, ScheduleHandler};
pub use traits::{Event, EventHandler};
