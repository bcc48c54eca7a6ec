//! YAML schema definitions for declarative schedule manifests

use crate::error::{Error, Result};
use crate::optim::{
    ConcatEntry, ConcatScheduler, CyclicalConfig, ParamGroups, ParamScheduler, ScheduleContext, ScheduleRegistry,
};
use crate::train::{attach_scheduler, Engine, Event};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected 'true' or 'false', got '{other}'"))),
        },
    }
}

fn default_event() -> Event {
    Event::IterationCompleted
}

/// Complete schedule manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Option written into every parameter group
    pub param_name: String,

    /// Event the schedule is bound to
    #[serde(default = "default_event")]
    pub event: Event,

    /// Record per-invocation snapshots into the run state
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub save_history: bool,

    /// Schedule definition
    pub schedule: ScheduleKindSpec,
}

/// Schedule definition, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleKindSpec {
    /// Triangular wave
    Linear(CyclicalConfig),
    /// Half-cosine decay from start to end
    CosineAnnealing(CyclicalConfig),
    /// Full cosine period, start -> end -> start
    Cosine(CyclicalConfig),
    /// Sequence of schedules with timed hand-off
    Concat {
        /// Entries in hand-off order
        sequence: Vec<EntrySpec>,
    },
}

/// One entry of a `concat` sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySpec {
    /// Schedule run while the entry is active
    #[serde(flatten)]
    pub schedule: ScheduleKindSpec,

    /// Countdown before hand-off; absent means the entry never hands off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<usize>,
}

impl ScheduleKindSpec {
    /// Kind tag as written in YAML
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleKindSpec::Linear(_) => "linear",
            ScheduleKindSpec::CosineAnnealing(_) => "cosine_annealing",
            ScheduleKindSpec::Cosine(_) => "cosine",
            ScheduleKindSpec::Concat { .. } => "concat",
        }
    }

    /// Cyclical parameters, `None` for `concat`
    pub fn cyclical(&self) -> Option<&CyclicalConfig> {
        match self {
            ScheduleKindSpec::Linear(config)
            | ScheduleKindSpec::CosineAnnealing(config)
            | ScheduleKindSpec::Cosine(config) => Some(config),
            ScheduleKindSpec::Concat { .. } => None,
        }
    }

    /// Build the schedule inside `ctx`, resolving kinds through `registry`
    pub fn build_in(&self, ctx: &ScheduleContext, registry: &ScheduleRegistry) -> Result<Box<dyn ParamScheduler>> {
        match self {
            ScheduleKindSpec::Concat { sequence } => {
                let entries = sequence
                    .iter()
                    .map(|entry| entry.to_entry(registry))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Box::new(ConcatScheduler::from_context(ctx.clone(), entries)?))
            }
            cyclical => {
                let config = cyclical
                    .cyclical()
                    .ok_or_else(|| Error::config(format!("'{}' has no cycle parameters", cyclical.kind())))?;
                registry.build(cyclical.kind(), ctx, config)
            }
        }
    }
}

impl EntrySpec {
    /// Convert into a concat entry whose factory rebuilds the schedule on every hand-off
    pub fn to_entry(&self, registry: &ScheduleRegistry) -> Result<ConcatEntry> {
        let config = self
            .schedule
            .cyclical()
            .ok_or_else(|| Error::config("concat entries cannot themselves be concat schedules"))?;
        ConcatEntry::from_registry(registry, self.schedule.kind(), *config, self.duration.into())
    }
}

impl ScheduleSpec {
    /// Shared context over `target` carrying this manifest's name and history flag
    pub fn context(&self, target: ParamGroups) -> ScheduleContext {
        ScheduleContext::new(target, self.param_name.clone()).with_history(self.save_history)
    }

    /// Build the schedule over `target` with the default registry
    pub fn build(&self, target: ParamGroups) -> Result<Box<dyn ParamScheduler>> {
        self.schedule.build_in(&self.context(target), &ScheduleRegistry::default())
    }

    /// Build the schedule over `target` and bind it to this manifest's event
    pub fn attach(&self, engine: &mut Engine, target: ParamGroups) -> Result<()> {
        attach_scheduler(engine, self.event, self.build(target)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::{EngineState, Output};
    use approx::assert_abs_diff_eq;

    const CONCAT_YAML: &str = r#"
param_name: lr
event: epoch_completed
save_history: "true"
schedule:
  kind: concat
  sequence:
    - kind: cosine_annealing
      start_value: 0.1
      end_value: 0.01
      cycle_size: 10
      duration: 9
    - kind: linear
      start_value: 0.01
      end_value: 0.1
      cycle_size: 4
      cycle_mult: 2.0
"#;

    #[test]
    fn test_parse_concat_manifest() {
        let spec: ScheduleSpec = serde_yaml::from_str(CONCAT_YAML).unwrap();
        assert_eq!(spec.param_name, "lr");
        assert_eq!(spec.event, Event::EpochCompleted);
        assert!(spec.save_history);

        let ScheduleKindSpec::Concat { sequence } = &spec.schedule else {
            panic!("expected concat, got {}", spec.schedule.kind());
        };
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[0].duration, Some(9));
        assert_eq!(sequence[0].schedule, ScheduleKindSpec::CosineAnnealing(CyclicalConfig::new(0.1, 0.01, 10.0)));
        assert_eq!(sequence[1].duration, None);
        assert_eq!(
            sequence[1].schedule,
            ScheduleKindSpec::Linear(CyclicalConfig::new(0.01, 0.1, 4.0).with_cycle_mult(2.0))
        );
    }

    #[test]
    fn test_defaults() {
        let yaml = "param_name: momentum\nschedule:\n  kind: cosine\n  start_value: 0.9\n  end_value: 0.8\n  cycle_size: 6\n";
        let spec: ScheduleSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.event, Event::IterationCompleted);
        assert!(!spec.save_history);
        assert_eq!(spec.schedule.cyclical().unwrap().cycle_mult, 1.0);
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let yaml = "param_name: lr\nschedule:\n  kind: step\n  start_value: 1\n  end_value: 0\n  cycle_size: 2\n";
        assert!(serde_yaml::from_str::<ScheduleSpec>(yaml).is_err());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_structure() {
        let spec: ScheduleSpec = serde_yaml::from_str(CONCAT_YAML).unwrap();
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: ScheduleSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn test_build_concat_runs_entries_in_order() {
        let spec: ScheduleSpec = serde_yaml::from_str(CONCAT_YAML).unwrap();
        let target = ParamGroups::uniform(2, "lr", 0.0);
        let mut schedule = spec.build(target.clone()).unwrap();
        assert_eq!(schedule.name(), "ConcatScheduler");

        let mut state = EngineState::new();
        for _ in 0..10 {
            schedule.apply(&mut state).unwrap();
        }
        // Tenth invocation is the last of the annealing entry
        assert!(target.values("lr").iter().all(|v| *v > 0.01 && *v < 0.1));

        schedule.apply(&mut state).unwrap();
        for value in target.values("lr") {
            assert_abs_diff_eq!(value, 0.01, epsilon = 1e-12);
        }
        assert_eq!(state.history_of("lr").unwrap().len(), 11);
    }

    #[test]
    fn test_nested_concat_rejected_at_build() {
        let nested = ScheduleKindSpec::Concat {
            sequence: vec![EntrySpec { schedule: ScheduleKindSpec::Concat { sequence: Vec::new() }, duration: Some(1) }],
        };
        let spec = ScheduleSpec {
            param_name: "lr".into(),
            event: Event::IterationCompleted,
            save_history: false,
            schedule: nested,
        };
        let Err(err) = spec.build(ParamGroups::single("lr", 0.0)) else {
            panic!("nested concat should not build");
        };
        assert!(err.is_configuration());
    }

    #[test]
    fn test_attach_binds_manifest_event() {
        let spec: ScheduleSpec = serde_yaml::from_str(CONCAT_YAML).unwrap();
        let target = ParamGroups::single("lr", 0.0);
        let mut engine = Engine::new();
        spec.attach(&mut engine, target.clone()).unwrap();
        assert_eq!(engine.handler_count(Event::EpochCompleted), 1);

        engine.run(3, 5, |_| Ok(Output::Scalar(0.0))).unwrap();
        assert_eq!(engine.state().history_of("lr").unwrap().len(), 3);
    }
}
