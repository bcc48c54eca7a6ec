//! Event-driven training loop
//!
//! This module provides the control loop schedules plug into:
//! - `Engine` - Emits lifecycle events around a step function
//! - `EngineState` - Iteration/epoch counters, metrics, output, parameter history
//! - `callback` - Event kinds, handler trait, schedule and monitor handlers
//!
//! # Example
//!
//! ```
//! use ritmo::optim::{CyclicalConfig, CyclicalScheduler, ParamGroups, ParamScheduler, Waveform};
//! use ritmo::train::{Engine, Event, Output};
//!
//! let target = ParamGroups::single("lr", 0.1);
//! let scheduler = CyclicalScheduler::new(
//!     Waveform::Cosine,
//!     target.clone(),
//!     "lr",
//!     CyclicalConfig::new(0.1, 0.5, 4.0),
//! )?
//! .with_history(true);
//!
//! let mut engine = Engine::new();
//! scheduler.attach(&mut engine, Event::IterationCompleted)?;
//! let state = engine.run(2, 4, |_| Ok(Output::Scalar(0.0)))?;
//! assert_eq!(state.history_of("lr").map(|h| h.len()), Some(8));
//! # Ok::<(), ritmo::Error>(())
//! ```

pub mod callback;
mod engine;
mod state;

pub use callback::{
    attach_scheduler, CallbackManager, Event, EventHandler, MemorySink, MetricMonitor,
    MetricRecord, MetricSink, ScheduleHandler, StateCounter, StepSource,
};
pub use engine::Engine;
pub use state::{EngineState, Output, ParamHistory};
