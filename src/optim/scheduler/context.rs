//! Typed construction inputs for schedules
//!
//! - `ScheduleContext` - what every schedule in a sequence shares
//! - `CyclicalConfig` - per-schedule fixed configuration
//! - `EventDuration` - how long a concatenated entry stays active
//! - `ScheduleRegistry` - kind tag -> constructor lookup

use super::cyclical::CyclicalScheduler;
use super::waveform::Waveform;
use super::ParamScheduler;
use crate::error::{Error, Result};
use crate::optim::ParamGroups;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

/// State handed to every schedule built inside a sequence
#[derive(Debug, Clone)]
pub struct ScheduleContext {
    /// Parameter groups to write
    pub target: ParamGroups,
    /// Option name to schedule
    pub param_name: String,
    /// Record snapshots into the engine state
    pub save_history: bool,
}

impl ScheduleContext {
    /// Create a context without history recording
    pub fn new(target: ParamGroups, param_name: impl Into<String>) -> Self {
        Self { target, param_name: param_name.into(), save_history: false }
    }

    /// Enable or disable history recording
    pub fn with_history(mut self, save_history: bool) -> Self {
        self.save_history = save_history;
        self
    }
}

/// Fixed configuration of a cyclical schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CyclicalConfig {
    /// Value at the start of each cycle
    pub start_value: f64,
    /// Value the waveform heads toward
    pub end_value: f64,
    /// Events per cycle (> 0)
    pub cycle_size: f64,
    /// Growth factor applied to `cycle_size` after each cycle (>= 1)
    #[serde(default = "default_cycle_mult")]
    pub cycle_mult: f64,
}

fn default_cycle_mult() -> f64 {
    1.0
}

impl CyclicalConfig {
    /// Create a config with `cycle_mult = 1`
    pub fn new(start_value: f64, end_value: f64, cycle_size: f64) -> Self {
        Self { start_value, end_value, cycle_size, cycle_mult: 1.0 }
    }

    /// Grow the cycle by `cycle_mult` after each completed cycle
    pub fn with_cycle_mult(mut self, cycle_mult: f64) -> Self {
        self.cycle_mult = cycle_mult;
        self
    }

    /// Check value and cycle parameters
    pub fn validate(&self) -> Result<()> {
        if !self.start_value.is_finite() || !self.end_value.is_finite() {
            return Err(Error::config(format!(
                "start_value and end_value must be finite, got {} and {}",
                self.start_value, self.end_value
            )));
        }
        if !(self.cycle_size.is_finite() && self.cycle_size > 0.0) {
            return Err(Error::config(format!(
                "cycle_size must be > 0, got {}",
                self.cycle_size
            )));
        }
        if !(self.cycle_mult.is_finite() && self.cycle_mult >= 1.0) {
            return Err(Error::config(format!(
                "cycle_mult must be >= 1, got {}",
                self.cycle_mult
            )));
        }
        Ok(())
    }
}

/// How many events a concatenated entry stays active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDuration {
    /// Hand off after the countdown starting at `n` goes negative,
    /// i.e. the entry serves `n + 1` invocations
    Events(usize),
    /// Never hand off
    Unbounded,
}

impl EventDuration {
    /// Countdown value set when the entry becomes active
    pub(crate) fn countdown(self) -> Option<i64> {
        match self {
            EventDuration::Events(n) => Some(n as i64),
            EventDuration::Unbounded => None,
        }
    }
}

impl From<Option<usize>> for EventDuration {
    fn from(value: Option<usize>) -> Self {
        value.map_or(EventDuration::Unbounded, EventDuration::Events)
    }
}

/// Builds a fresh schedule from the shared context
pub type ScheduleFactory = Rc<dyn Fn(&ScheduleContext) -> Result<Box<dyn ParamScheduler>>>;

/// Constructor registered under a kind tag
pub type Constructor = fn(&ScheduleContext, &CyclicalConfig) -> Result<Box<dyn ParamScheduler>>;

fn build_linear(ctx: &ScheduleContext, config: &CyclicalConfig) -> Result<Box<dyn ParamScheduler>> {
    Ok(Box::new(CyclicalScheduler::from_context(Waveform::Linear, ctx, *config)?))
}

fn build_cosine_annealing(
    ctx: &ScheduleContext,
    config: &CyclicalConfig,
) -> Result<Box<dyn ParamScheduler>> {
    Ok(Box::new(CyclicalScheduler::from_context(Waveform::CosineAnnealing, ctx, *config)?))
}

fn build_cosine(ctx: &ScheduleContext, config: &CyclicalConfig) -> Result<Box<dyn ParamScheduler>> {
    Ok(Box::new(CyclicalScheduler::from_context(Waveform::Cosine, ctx, *config)?))
}

/// Lookup from schedule kind tag to constructor
///
/// The default registry knows `linear`, `cosine_annealing` and `cosine`.
/// Additional kinds can be registered by name.
#[derive(Clone)]
pub struct ScheduleRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl ScheduleRegistry {
    /// Registry without any kinds
    pub fn empty() -> Self {
        Self { constructors: BTreeMap::new() }
    }

    /// Register `constructor` under `kind`, replacing any previous one
    pub fn register(&mut self, kind: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    /// Whether `kind` is known
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kind tags, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Constructor for `kind`
    pub fn get(&self, kind: &str) -> Result<Constructor> {
        self.constructors.get(kind).copied().ok_or_else(|| {
            let known: Vec<_> = self.kinds().collect();
            Error::config(format!("unknown schedule kind '{kind}' (known: {})", known.join(", ")))
        })
    }

    /// Build a schedule of `kind` immediately
    pub fn build(
        &self,
        kind: &str,
        ctx: &ScheduleContext,
        config: &CyclicalConfig,
    ) -> Result<Box<dyn ParamScheduler>> {
        (self.get(kind)?)(ctx, config)
    }

    /// Factory building `kind` with `config` each time it is invoked
    pub fn factory(&self, kind: &str, config: CyclicalConfig) -> Result<ScheduleFactory> {
        let constructor = self.get(kind)?;
        config.validate()?;
        Ok(Rc::new(move |ctx: &ScheduleContext| constructor(ctx, &config)))
    }
}

impl Default for ScheduleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Waveform::Linear.as_str(), build_linear);
        registry.register(Waveform::CosineAnnealing.as_str(), build_cosine_annealing);
        registry.register(Waveform::Cosine.as_str(), build_cosine);
        registry
    }
}

impl std::fmt::Debug for ScheduleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleRegistry").field("kinds", &self.kinds().collect::<Vec<_>>()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::EngineState;

    #[test]
    fn test_config_validation() {
        assert!(CyclicalConfig::new(0.1, 0.01, 10.0).validate().is_ok());
        assert!(CyclicalConfig::new(0.1, 0.01, 0.0).validate().is_err());
        assert!(CyclicalConfig::new(0.1, 0.01, -3.0).validate().is_err());
        assert!(CyclicalConfig::new(0.1, 0.01, 10.0).with_cycle_mult(0.5).validate().is_err());
        assert!(CyclicalConfig::new(f64::NAN, 0.01, 10.0).validate().is_err());
        assert!(CyclicalConfig::new(0.1, f64::INFINITY, 10.0).validate().is_err());
    }

    #[test]
    fn test_config_yaml_defaults_cycle_mult() {
        let config: CyclicalConfig =
            serde_yaml::from_str("start_value: 1.0\nend_value: 0.0\ncycle_size: 4\n").unwrap();
        assert_eq!(config, CyclicalConfig::new(1.0, 0.0, 4.0));
    }

    #[test]
    fn test_duration_countdown() {
        assert_eq!(EventDuration::Events(3).countdown(), Some(3));
        assert_eq!(EventDuration::Unbounded.countdown(), None);
        assert_eq!(EventDuration::from(Some(2)), EventDuration::Events(2));
        assert_eq!(EventDuration::from(None), EventDuration::Unbounded);
    }

    #[test]
    fn test_default_registry_kinds() {
        let registry = ScheduleRegistry::default();
        let kinds: Vec<_> = registry.kinds().collect();
        assert_eq!(kinds, vec!["cosine", "cosine_annealing", "linear"]);

        let err = registry.get("exponential").unwrap_err();
        assert!(err.to_string().contains("exponential"));
        assert!(err.to_string().contains("linear"));
    }

    #[test]
    fn test_registry_builds_into_context() {
        let target = ParamGroups::single("lr", 0.5);
        let ctx = ScheduleContext::new(target.clone(), "lr").with_history(true);
        let registry = ScheduleRegistry::default();

        let mut schedule = registry.build("linear", &ctx, &CyclicalConfig::new(1.0, 0.0, 4.0)).unwrap();
        let mut state = EngineState::new();
        schedule.apply(&mut state).unwrap();

        assert_eq!(schedule.param_name(), "lr");
        assert_eq!(target.get(0, "lr"), Some(1.0));
        assert_eq!(state.history_of("lr").unwrap().len(), 1);
    }

    #[test]
    fn test_factory_validates_eagerly() {
        let registry = ScheduleRegistry::default();
        assert!(registry.factory("cosine", CyclicalConfig::new(1.0, 0.0, 0.0)).is_err());
        assert!(registry.factory("cosine", CyclicalConfig::new(1.0, 0.0, 2.0)).is_ok());
    }

    #[test]
    fn test_custom_kind() {
        fn flat(ctx: &ScheduleContext, config: &CyclicalConfig) -> Result<Box<dyn ParamScheduler>> {
            let flat = CyclicalConfig { end_value: config.start_value, ..*config };
            Ok(Box::new(CyclicalScheduler::from_context(Waveform::Linear, ctx, flat)?))
        }

        let mut registry = ScheduleRegistry::empty();
        assert!(!registry.contains("flat"));
        registry.register("flat", flat);
        assert!(registry.contains("flat"));

        let target = ParamGroups::single("lr", 0.0);
        let ctx = ScheduleContext::new(target.clone(), "lr");
        let mut schedule = registry.build("flat", &ctx, &CyclicalConfig::new(0.3, 0.0, 4.0)).unwrap();
        let mut state = EngineState::new();
        for _ in 0..5 {
            schedule.apply(&mut state).unwrap();
            assert_eq!(target.get(0, "lr"), Some(0.3));
        }
    }
}
