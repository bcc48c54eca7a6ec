//! Parameter schedules
//!
//! Provides event-driven schedules for a single optimizer option:
//! - `CyclicalScheduler` - Repeating waveform with optional cycle growth
//! - `ConcatScheduler` - Sequence of schedules with timed hand-off
//! - `Waveform` - `Linear`, `CosineAnnealing` and `Cosine` cycle shapes
//!
//! A schedule is bound to one engine event and writes a new value into every
//! parameter group each time that event fires.

mod base;
mod concat;
mod context;
mod cyclical;
mod waveform;

#[cfg(test)]
mod proptests;

pub use base::ScheduleState;
pub use concat::{ConcatEntry, ConcatScheduler};
pub use context::{
    Constructor, CyclicalConfig, EventDuration, ScheduleContext, ScheduleFactory, ScheduleRegistry,
};
pub use cyclical::CyclicalScheduler;
pub use waveform::Waveform;

use crate::error::Result;
use crate::optim::ParamGroups;
use crate::train::callback::{attach_scheduler, Event};
use crate::train::{Engine, EngineState};

/// A schedule for one named option of a set of parameter groups
pub trait ParamScheduler {
    /// Compute the next value, write it into every group and advance.
    ///
    /// Called once per subscribed event.
    fn apply(&mut self, state: &mut EngineState) -> Result<()>;

    /// Name of the option being scheduled
    fn param_name(&self) -> &str;

    /// Parameter groups being written
    fn target(&self) -> &ParamGroups;

    /// Position of the schedule within its current cycle
    fn event_index(&self) -> usize;

    /// Get scheduler name for logging
    fn name(&self) -> &'static str {
        "ParamScheduler"
    }

    /// Subscribe this schedule to `event` on `engine`.
    ///
    /// Only `IterationCompleted` and `EpochCompleted` are accepted.
    fn attach(self, engine: &mut Engine, event: Event) -> Result<()>
    where
        Self: Sized + 'static,
    {
        attach_scheduler(engine, event, Box::new(self))
    }
}

/// Run a schedule for `events` invocations on a scratch target and return
/// `(invocation, value)` pairs.
///
/// `build` receives a context over one parameter group (initialized to 0)
/// holding `param_name`; the value reported for each invocation is read back
/// from that group.
pub fn simulate<F>(param_name: &str, events: usize, build: F) -> Result<Vec<(usize, f64)>>
where
    F: FnOnce(ScheduleContext) -> Result<Box<dyn ParamScheduler>>,
{
    let target = ParamGroups::single(param_name, 0.0);
    let mut scheduler = build(ScheduleContext::new(target.clone(), param_name))?;
    let mut state = EngineState::new();

    let mut values = Vec::new();
    for event in 0..events {
        scheduler.apply(&mut state)?;
        let value = target.get(0, param_name).unwrap_or(f64::NAN);
        values.push((event, value));
    }
    Ok(values)
}
