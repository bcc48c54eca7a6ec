//! State shared by every schedule: target, parameter name, event counter

use super::context::ScheduleContext;
use crate::optim::ParamGroups;
use crate::train::EngineState;

/// Write-side of a schedule.
///
/// Concrete schedules compute a value and hand it to [`ScheduleState::write`],
/// which broadcasts it to every parameter group, records history when asked
/// to, and advances the event counter.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    param_name: String,
    target: ParamGroups,
    save_history: bool,
    event_index: usize,
}

impl ScheduleState {
    /// Create state writing `param_name` into `target`
    pub fn new(target: ParamGroups, param_name: impl Into<String>) -> Self {
        Self { param_name: param_name.into(), target, save_history: false, event_index: 0 }
    }

    /// Create state from a shared schedule context
    pub fn from_context(ctx: &ScheduleContext) -> Self {
        Self::new(ctx.target.clone(), ctx.param_name.clone()).with_history(ctx.save_history)
    }

    /// Record a snapshot into the engine state after every write
    pub fn with_history(mut self, save_history: bool) -> Self {
        self.save_history = save_history;
        self
    }

    /// Name of the option being scheduled
    pub fn param_name(&self) -> &str {
        &self.param_name
    }

    /// Parameter groups being written
    pub fn target(&self) -> &ParamGroups {
        &self.target
    }

    /// Whether snapshots are recorded
    pub fn save_history(&self) -> bool {
        self.save_history
    }

    /// Number of writes since construction or the last reset
    pub fn event_index(&self) -> usize {
        self.event_index
    }

    /// Reset the event counter to zero
    pub fn reset_index(&mut self) {
        self.event_index = 0;
    }

    /// Broadcast `value`, optionally record it, and advance the counter.
    ///
    /// An empty target receives nothing but the counter still advances.
    pub fn write(&mut self, value: f64, state: &mut EngineState) {
        self.target.set_all(&self.param_name, value);

        if self.save_history {
            state.record_param(&self.param_name, self.target.values(&self.param_name));
        }

        tracing::trace!(param = %self.param_name, index = self.event_index, value, "applied");
        self.event_index += 1;
    }
}
