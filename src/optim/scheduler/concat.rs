//! Concatenation of schedules with timed hand-off

use super::context::{CyclicalConfig, EventDuration, ScheduleContext, ScheduleFactory, ScheduleRegistry};
use super::cyclical::CyclicalScheduler;
use super::waveform::Waveform;
use super::ParamScheduler;
use crate::error::{Error, Result};
use crate::optim::ParamGroups;
use crate::train::EngineState;
use std::fmt;
use std::rc::Rc;

/// One step of a concatenated sequence: how to build the schedule and how
/// long it stays active
#[derive(Clone)]
pub struct ConcatEntry {
    label: String,
    factory: ScheduleFactory,
    duration: EventDuration,
}

impl ConcatEntry {
    /// Entry built by an arbitrary factory
    pub fn new(label: impl Into<String>, factory: ScheduleFactory, duration: EventDuration) -> Self {
        Self { label: label.into(), factory, duration }
    }

    /// Entry running a cyclical waveform with a fixed configuration
    pub fn cyclical(waveform: Waveform, config: CyclicalConfig, duration: EventDuration) -> Result<Self> {
        config.validate()?;
        let factory: ScheduleFactory =
            Rc::new(move |ctx: &ScheduleContext| -> Result<Box<dyn ParamScheduler>> {
                Ok(Box::new(CyclicalScheduler::from_context(waveform, ctx, config)?))
            });
        Ok(Self::new(waveform.as_str(), factory, duration))
    }

    /// Entry whose constructor is looked up by kind in `registry`
    pub fn from_registry(
        registry: &ScheduleRegistry,
        kind: &str,
        config: CyclicalConfig,
        duration: EventDuration,
    ) -> Result<Self> {
        Ok(Self::new(kind, registry.factory(kind, config)?, duration))
    }

    /// Label used in logs
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Active duration
    pub fn duration(&self) -> EventDuration {
        self.duration
    }
}

impl fmt::Debug for ConcatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatEntry")
            .field("label", &self.label)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

/// Runs a sequence of schedules one after another, looping forever.
///
/// The countdown starts expired, so the first apply builds entry 0. Each
/// apply decrements a bounded countdown; once it goes negative the next entry
/// is built from the shared [`ScheduleContext`], its duration becomes the new
/// countdown and the sequence index advances modulo the sequence length. An
/// entry of duration `d` therefore serves `d + 1` invocations, and every
/// hand-off starts the incoming schedule from a fresh counter.
pub struct ConcatScheduler {
    context: ScheduleContext,
    sequence: Vec<ConcatEntry>,
    sequence_index: usize,
    countdown: Option<i64>,
    active: Option<Box<dyn ParamScheduler>>,
    active_entry: Option<usize>,
    switches: usize,
}

impl ConcatScheduler {
    /// Create a concatenation writing `param_name` into `target`
    pub fn new(target: ParamGroups, param_name: impl Into<String>, sequence: Vec<ConcatEntry>) -> Result<Self> {
        Self::from_context(ScheduleContext::new(target, param_name), sequence)
    }

    /// Create a concatenation from a shared context.
    ///
    /// Every entry is built once up front so that a failing factory or an
    /// entry scheduling a different option is rejected here rather than at
    /// its first hand-off.
    pub fn from_context(context: ScheduleContext, sequence: Vec<ConcatEntry>) -> Result<Self> {
        if sequence.is_empty() {
            return Err(Error::config("concat schedule needs at least one entry"));
        }
        for (position, entry) in sequence.iter().enumerate() {
            build_entry(&context, position, entry)?;
        }
        Ok(Self {
            context,
            sequence,
            sequence_index: 0,
            countdown: Some(0),
            active: None,
            active_entry: None,
            switches: 0,
        })
    }

    /// Propagate history recording to every schedule built from now on
    pub fn with_history(mut self, save_history: bool) -> Self {
        self.context.save_history = save_history;
        self
    }

    /// Index of the entry currently delegated to, `None` before the first apply
    pub fn active_entry(&self) -> Option<usize> {
        self.active_entry
    }

    /// Index of the entry the next hand-off will build
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    /// Number of hand-offs performed, including the initial one
    pub fn switches(&self) -> usize {
        self.switches
    }

    /// Remaining countdown, `None` while an unbounded entry is active
    pub fn countdown(&self) -> Option<i64> {
        self.countdown
    }

    /// Entries in sequence order
    pub fn entries(&self) -> &[ConcatEntry] {
        &self.sequence
    }

    /// Build the next entry and make it active
    fn switch(&mut self) -> Result<()> {
        let position = self.sequence_index;
        let entry = &self.sequence[position];
        let scheduler = build_entry(&self.context, position, entry)?;

        self.countdown = entry.duration.countdown();
        tracing::debug!(
            param = %self.context.param_name,
            entry = position,
            label = %entry.label,
            duration = ?entry.duration,
            "concat hand-off"
        );

        self.active = Some(scheduler);
        self.active_entry = Some(position);
        self.sequence_index = (position + 1) % self.sequence.len();
        self.switches += 1;
        Ok(())
    }
}

/// Build `entry` from `context`, rejecting a schedule bound to another option
fn build_entry(context: &ScheduleContext, position: usize, entry: &ConcatEntry) -> Result<Box<dyn ParamScheduler>> {
    let scheduler = (entry.factory)(context)?;
    if scheduler.param_name() != context.param_name {
        return Err(Error::config(format!(
            "entry {position} ('{}') schedules '{}' but the sequence schedules '{}'",
            entry.label,
            scheduler.param_name(),
            context.param_name
        )));
    }
    Ok(scheduler)
}

impl ParamScheduler for ConcatScheduler {
    fn apply(&mut self, state: &mut EngineState) -> Result<()> {
        let expired = match self.countdown.as_mut() {
            Some(remaining) => {
                *remaining -= 1;
                *remaining < 0
            }
            None => false,
        };
        if expired {
            self.switch()?;
        }

        match self.active.as_mut() {
            Some(active) => active.apply(state),
            None => Err(Error::config("concat schedule has no active entry")),
        }
    }

    fn param_name(&self) -> &str {
        &self.context.param_name
    }

    fn target(&self) -> &ParamGroups {
        &self.context.target
    }

    fn event_index(&self) -> usize {
        self.active.as_ref().map_or(0, |active| active.event_index())
    }

    fn name(&self) -> &'static str {
        "ConcatScheduler"
    }
}

impl fmt::Debug for ConcatScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatScheduler")
            .field("param_name", &self.context.param_name)
            .field("sequence", &self.sequence)
            .field("sequence_index", &self.sequence_index)
            .field("countdown", &self.countdown)
            .field("active_entry", &self.active_entry)
            .finish()
    }
}
