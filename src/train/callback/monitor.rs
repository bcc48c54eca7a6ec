//! Metric monitor: read-side contract of dashboard and tracker loggers
//!
//! The monitor never writes back into the run state. It reads named metrics
//! and the last output, then forwards `(name, value, step)` records to a
//! [`MetricSink`]. Actual display or storage backends live outside this crate
//! and plug in through that trait.

use super::traits::{Event, EventHandler};
use crate::error::{Error, Result};
use crate::train::engine::Engine;
use crate::train::state::{EngineState, Output};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Counter read from the engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCounter {
    /// `state.iteration`
    Iteration,
    /// `state.epoch`
    Epoch,
}

/// Where the monitor's step number comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSource {
    /// Own counter, incremented on every event starting at `next`
    FixedCounter { next: usize },
    /// Read from the engine state on every event
    DerivedFromState(StateCounter),
}

impl StepSource {
    /// Default source for an event: iteration count or epoch count
    pub fn for_event(event: Event) -> Self {
        match event {
            Event::EpochCompleted | Event::EpochStarted => StepSource::DerivedFromState(StateCounter::Epoch),
            _ => StepSource::DerivedFromState(StateCounter::Iteration),
        }
    }

    fn next_step(&mut self, state: &EngineState) -> usize {
        match self {
            StepSource::FixedCounter { next } => {
                let step = *next;
                *next += 1;
                step
            }
            StepSource::DerivedFromState(StateCounter::Iteration) => state.iteration,
            StepSource::DerivedFromState(StateCounter::Epoch) => state.epoch,
        }
    }
}

/// One forwarded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    pub step: usize,
}

/// Destination for monitored values
pub trait MetricSink {
    /// Forward one value
    fn record(&mut self, name: &str, value: f64, step: usize) -> Result<()>;
}

/// In-process sink; clones share the same record list
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Rc<RefCell<Vec<MetricRecord>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn records(&self) -> Vec<MetricRecord> {
        self.records.borrow().clone()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl MetricSink for MemorySink {
    fn record(&mut self, name: &str, value: f64, step: usize) -> Result<()> {
        self.records.borrow_mut().push(MetricRecord { name: name.to_string(), value, step });
        Ok(())
    }
}

/// Maps the last output to what should be forwarded
pub type OutputTransform = Box<dyn Fn(&Output) -> Output>;

/// Forwards metrics and transformed output to a sink on a bound event
pub struct MetricMonitor {
    prefix: String,
    update_period: usize,
    metric_names: Option<Vec<String>>,
    output_transform: Option<OutputTransform>,
    step_source: Option<StepSource>,
    sink: Box<dyn MetricSink>,
}

impl MetricMonitor {
    /// Create a monitor forwarding to `sink`
    pub fn new<S: MetricSink + 'static>(sink: S) -> Self {
        Self {
            prefix: String::new(),
            update_period: 1,
            metric_names: None,
            output_transform: None,
            step_source: None,
            sink: Box::new(sink),
        }
    }

    /// Prepend `prefix` to every forwarded name
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Forward only when `step % update_period == 0`
    pub fn with_update_period(mut self, update_period: usize) -> Self {
        self.update_period = update_period;
        self
    }

    /// Metrics to read from `state.metrics`
    pub fn with_metric_names<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.metric_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Select what to forward from `state.output`
    pub fn with_output_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Output) -> Output + 'static,
    {
        self.output_transform = Some(Box::new(transform));
        self
    }

    /// Override the default step source
    pub fn with_step_source(mut self, source: StepSource) -> Self {
        self.step_source = Some(source);
        self
    }

    /// Check the setup: positive period, well-formed metric names
    pub fn validate(&self) -> Result<()> {
        if self.update_period == 0 {
            return Err(Error::config("update_period must be > 0"));
        }
        if let Some(names) = &self.metric_names {
            if names.is_empty() {
                return Err(Error::config("metric_names must not be empty when given"));
            }
            let mut seen = BTreeSet::new();
            for name in names {
                if name.trim().is_empty() {
                    return Err(Error::config("metric_names contains a blank name"));
                }
                if !seen.insert(name.as_str()) {
                    return Err(Error::config(format!("metric_names lists '{name}' twice")));
                }
            }
        }
        Ok(())
    }

    /// Validate and subscribe to `event` (`IterationCompleted` or `EpochCompleted`)
    pub fn attach(mut self, engine: &mut Engine, event: Event) -> Result<()> {
        let event = event.ensure_bindable()?;
        self.validate()?;
        if self.step_source.is_none() {
            self.step_source = Some(StepSource::for_event(event));
        }
        engine.add_event_handler(event, self);
        Ok(())
    }

    fn collect(&self, state: &EngineState) -> Result<Vec<(String, f64)>> {
        let mut values = Vec::new();

        if let Some(names) = &self.metric_names {
            for name in names {
                values.push((name.clone(), state.metric(name)?));
            }
        }

        if let Some(transform) = &self.output_transform {
            values.extend(transform(state.output()?).into_pairs());
        }

        Ok(values)
    }
}

impl EventHandler for MetricMonitor {
    fn handle(&mut self, state: &mut EngineState) -> Result<()> {
        let source = self.step_source.get_or_insert(StepSource::DerivedFromState(StateCounter::Iteration));
        let step = source.next_step(state);
        if step % self.update_period != 0 {
            return Ok(());
        }

        for (name, value) in self.collect(state)? {
            let full_name = format!("{}{}", self.prefix, name);
            self.sink.record(&full_name, value, step)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MetricMonitor"
    }
}
