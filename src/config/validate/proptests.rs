//! Property-based tests for manifest validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::schema::*;
use crate::optim::{CyclicalConfig, ParamGroups};
use crate::train::Event;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = CyclicalConfig> {
    (
        -10.0f64..10.0, // start_value
        -10.0f64..10.0, // end_value
        0.5f64..1000.0, // cycle_size
        1.0f64..4.0,    // cycle_mult
    )
        .prop_map(|(start, end, size, mult)| CyclicalConfig::new(start, end, size).with_cycle_mult(mult))
}

fn arb_single() -> impl Strategy<Value = ScheduleKindSpec> {
    (0u8..3, arb_config()).prop_map(|(kind, config)| match kind {
        0 => ScheduleKindSpec::Linear(config),
        1 => ScheduleKindSpec::CosineAnnealing(config),
        _ => ScheduleKindSpec::Cosine(config),
    })
}

fn arb_valid_spec() -> impl Strategy<Value = ScheduleSpec> {
    let entry = (arb_single(), proptest::option::of(0usize..100))
        .prop_map(|(schedule, duration)| EntrySpec { schedule, duration });
    let schedule = prop_oneof![
        arb_single(),
        proptest::collection::vec(entry, 1..5).prop_map(|sequence| ScheduleKindSpec::Concat { sequence }),
    ];
    (schedule, any::<bool>(), any::<bool>()).prop_map(|(schedule, per_epoch, save_history)| ScheduleSpec {
        param_name: "lr".to_string(),
        event: if per_epoch { Event::EpochCompleted } else { Event::IterationCompleted },
        save_history,
        schedule,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn prop_valid_spec_builds(spec in arb_valid_spec()) {
        prop_assert!(spec.build(ParamGroups::single("lr", 0.0)).is_ok());
    }

    #[test]
    fn prop_non_positive_cycle_size_fails(config in arb_config(), size in -100.0f64..=0.0) {
        let spec = ScheduleSpec {
            param_name: "lr".to_string(),
            event: Event::IterationCompleted,
            save_history: false,
            schedule: ScheduleKindSpec::Linear(CyclicalConfig { cycle_size: size, ..config }),
        };
        prop_assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidCycleSize(_))));
    }

    #[test]
    fn prop_shrinking_cycle_mult_fails(config in arb_config(), mult in 0.0f64..0.999) {
        let spec = ScheduleSpec {
            param_name: "lr".to_string(),
            event: Event::EpochCompleted,
            save_history: false,
            schedule: ScheduleKindSpec::Cosine(config.with_cycle_mult(mult)),
        };
        prop_assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidCycleMult(_))));
    }

    #[test]
    fn prop_unbindable_event_fails(spec in arb_valid_spec(), index in 0usize..6) {
        let event = Event::ALL[index];
        let mut spec = spec;
        spec.event = event;
        prop_assert_eq!(validate_spec(&spec).is_ok(), event.is_bindable());
    }
}
