//! Cyclical schedule driven by a waveform

use super::base::ScheduleState;
use super::context::{CyclicalConfig, ScheduleContext};
use super::waveform::Waveform;
use super::ParamScheduler;
use crate::error::Result;
use crate::optim::ParamGroups;
use crate::train::EngineState;

/// Repeats a waveform over cycles of `cycle_size` events.
///
/// When a cycle completes the event counter resets to zero, the cycle length
/// is multiplied by `cycle_mult` and the cycle count increments. Within a
/// cycle the written value is `waveform(event_index / cycle_size)`.
///
/// # Example
///
/// ```
/// use ritmo::optim::{CyclicalConfig, CyclicalScheduler, ParamGroups, ParamScheduler, Waveform};
/// use ritmo::train::EngineState;
///
/// let target = ParamGroups::single("lr", 0.1);
/// let config = CyclicalConfig::new(0.1, 0.01, 10.0);
/// let mut scheduler = CyclicalScheduler::new(Waveform::Linear, target.clone(), "lr", config)?;
///
/// let mut state = EngineState::new();
/// for _ in 0..6 {
///     scheduler.apply(&mut state)?;
/// }
/// assert!((target.get(0, "lr").unwrap() - 0.01).abs() < 1e-12);
/// # Ok::<(), ritmo::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CyclicalScheduler {
    base: ScheduleState,
    waveform: Waveform,
    start_value: f64,
    end_value: f64,
    cycle_size: f64,
    cycle_mult: f64,
    cycle: usize,
}

impl CyclicalScheduler {
    /// Create a schedule writing `param_name` into `target`
    pub fn new(
        waveform: Waveform,
        target: ParamGroups,
        param_name: impl Into<String>,
        config: CyclicalConfig,
    ) -> Result<Self> {
        Self::with_state(waveform, ScheduleState::new(target, param_name), config)
    }

    /// Create a schedule from a shared context (target, name, history flag)
    pub fn from_context(waveform: Waveform, ctx: &ScheduleContext, config: CyclicalConfig) -> Result<Self> {
        Self::with_state(waveform, ScheduleState::from_context(ctx), config)
    }

    fn with_state(waveform: Waveform, base: ScheduleState, config: CyclicalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base,
            waveform,
            start_value: config.start_value,
            end_value: config.end_value,
            cycle_size: config.cycle_size,
            cycle_mult: config.cycle_mult,
            cycle: 0,
        })
    }

    /// Record a snapshot into the engine state on every apply
    pub fn with_history(mut self, save_history: bool) -> Self {
        self.base = self.base.with_history(save_history);
        self
    }

    /// Waveform shape
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Current cycle length in events
    pub fn cycle_size(&self) -> f64 {
        self.cycle_size
    }

    /// Completed cycles
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Position within the current cycle, in `[0, 1)` once the boundary check ran
    pub fn progress(&self) -> f64 {
        self.base.event_index() as f64 / self.cycle_size
    }

    /// Value for the current position
    pub fn value(&self) -> f64 {
        self.waveform.compute(self.progress(), self.start_value, self.end_value)
    }

    /// Start a new cycle if the current one is exhausted
    fn roll_cycle(&mut self) {
        let index = self.base.event_index();
        if index != 0 && index as f64 >= self.cycle_size {
            self.base.reset_index();
            self.cycle_size *= self.cycle_mult;
            self.cycle += 1;
            tracing::debug!(
                param = %self.base.param_name(),
                cycle = self.cycle,
                cycle_size = self.cycle_size,
                "cycle completed"
            );
        }
    }
}

impl ParamScheduler for CyclicalScheduler {
    fn apply(&mut self, state: &mut EngineState) -> Result<()> {
        self.roll_cycle();
        let value = self.value();
        self.base.write(value, state);
        Ok(())
    }

    fn param_name(&self) -> &str {
        self.base.param_name()
    }

    fn target(&self) -> &ParamGroups {
        self.base.target()
    }

    fn event_index(&self) -> usize {
        self.base.event_index()
    }

    fn name(&self) -> &'static str {
        match self.waveform {
            Waveform::Linear => "LinearScheduler",
            Waveform::CosineAnnealing => "CosineAnnealingScheduler",
            Waveform::Cosine => "CosineScheduler",
        }
    }
}
