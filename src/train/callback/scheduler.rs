//! Parameter schedule handler

use super::traits::{Event, EventHandler};
use crate::error::Result;
use crate::optim::ParamScheduler;
use crate::train::engine::Engine;
use crate::train::state::EngineState;

/// Handler that applies a parameter schedule each time its event fires
///
/// # Example
///
/// ```
/// use ritmo::optim::{CyclicalConfig, CyclicalScheduler, ParamGroups, Waveform};
/// use ritmo::train::{attach_scheduler, Engine, Event, Output};
///
/// let target = ParamGroups::single("lr", 0.1);
/// let config = CyclicalConfig::new(0.1, 0.01, 10.0);
/// let scheduler = CyclicalScheduler::new(Waveform::CosineAnnealing, target.clone(), "lr", config)?;
///
/// let mut engine = Engine::new();
/// attach_scheduler(&mut engine, Event::IterationCompleted, Box::new(scheduler))?;
/// engine.run(1, 5, |_| Ok(Output::Scalar(0.0)))?;
/// assert!(target.get(0, "lr").unwrap() < 0.1);
/// # Ok::<(), ritmo::Error>(())
/// ```
pub struct ScheduleHandler {
    scheduler: Box<dyn ParamScheduler>,
}

impl ScheduleHandler {
    /// Wrap a schedule
    pub fn new(scheduler: Box<dyn ParamScheduler>) -> Self {
        Self { scheduler }
    }

    /// The wrapped schedule
    pub fn scheduler(&self) -> &dyn ParamScheduler {
        self.scheduler.as_ref()
    }
}

impl EventHandler for ScheduleHandler {
    fn handle(&mut self, state: &mut EngineState) -> Result<()> {
        self.scheduler.apply(state)
    }

    fn name(&self) -> &'static str {
        "ScheduleHandler"
    }
}

/// Subscribe `scheduler` to `event`, which must be `IterationCompleted` or
/// `EpochCompleted`
pub fn attach_scheduler(engine: &mut Engine, event: Event, scheduler: Box<dyn ParamScheduler>) -> Result<()> {
    let event = event.ensure_bindable()?;
    tracing::debug!(
        event = %event,
        scheduler = scheduler.name(),
        param = scheduler.param_name(),
        "schedule attached"
    );
    engine.add_event_handler(event, ScheduleHandler::new(scheduler));
    Ok(())
}
