//! # ritmo: event-driven hyperparameter schedules
//!
//! Schedules adjust one named optimizer option (typically the learning rate)
//! each time a training-loop event fires. Values are broadcast to every
//! parameter group.
//!
//! ## Modules
//!
//! - `optim`: parameter groups, cyclical waveforms, concatenated schedules
//! - `train`: minimal event engine, run state, schedule and monitor handlers
//! - `config`: YAML schedule manifests and their validation
//! - `cli`: command handlers behind the `ritmo` binary
//!
//! ## Example
//!
//! ```
//! use ritmo::optim::{CyclicalConfig, CyclicalScheduler, ParamGroups, ParamScheduler, Waveform};
//! use ritmo::train::{Engine, Event, Output};
//!
//! let target = ParamGroups::single("lr", 0.1);
//! let schedule = CyclicalScheduler::new(
//!     Waveform::Linear,
//!     target.clone(),
//!     "lr",
//!     CyclicalConfig::new(0.1, 0.01, 10.0),
//! )?;
//!
//! let mut engine = Engine::new();
//! schedule.attach(&mut engine, Event::IterationCompleted)?;
//! engine.run(1, 6, |_| Ok(Output::Scalar(0.0)))?;
//!
//! assert!((target.get(0, "lr").unwrap() - 0.01).abs() < 1e-12);
//! # Ok::<(), ritmo::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod optim;
pub mod train;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
