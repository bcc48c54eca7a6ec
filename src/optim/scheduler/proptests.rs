//! Property-based tests for parameter schedules

use super::*;
use crate::train::EngineState;
use proptest::prelude::*;

fn arb_waveform() -> impl Strategy<Value = Waveform> {
    prop_oneof![Just(Waveform::Linear), Just(Waveform::CosineAnnealing), Just(Waveform::Cosine)]
}

fn arb_config() -> impl Strategy<Value = CyclicalConfig> {
    (-10.0f64..10.0, -10.0f64..10.0, 1usize..50, 1.0f64..3.0).prop_map(|(start, end, size, mult)| {
        CyclicalConfig::new(start, end, size as f64).with_cycle_mult(mult)
    })
}

fn values(scheduler: &mut dyn ParamScheduler, events: usize) -> Vec<f64> {
    let mut state = EngineState::new();
    (0..events)
        .map(|_| {
            scheduler.apply(&mut state).unwrap();
            scheduler.target().get(0, scheduler.param_name()).unwrap()
        })
        .collect()
}

fn scheduler(waveform: Waveform, config: CyclicalConfig) -> CyclicalScheduler {
    CyclicalScheduler::new(waveform, ParamGroups::single("lr", 0.0), "lr", config).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_linear_start_mid_wrap(half in 1usize..32, start in -5.0f64..5.0, end in -5.0f64..5.0) {
        let size = 2 * half;
        let mut s = scheduler(Waveform::Linear, CyclicalConfig::new(start, end, size as f64));
        let v = values(&mut s, size + 1);

        prop_assert!((v[0] - start).abs() < 1e-9);
        prop_assert!((v[half] - end).abs() < 1e-9);
        prop_assert!((v[size] - start).abs() < 1e-9);
    }

    #[test]
    fn prop_values_stay_between_endpoints(waveform in arb_waveform(), config in arb_config()) {
        let lo = config.start_value.min(config.end_value) - 1e-9;
        let hi = config.start_value.max(config.end_value) + 1e-9;
        let mut s = scheduler(waveform, config);
        for value in values(&mut s, 200) {
            prop_assert!(value >= lo && value <= hi, "{value} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn prop_cycle_mult_two_doubles(size in 1usize..10) {
        let config = CyclicalConfig::new(1.0, 0.0, size as f64).with_cycle_mult(2.0);
        let mut s = scheduler(Waveform::CosineAnnealing, config);

        // Three full cycles of n, 2n, 4n events, then the first event of the fourth
        values(&mut s, 7 * size + 1);
        prop_assert_eq!(s.cycle(), 3);
        prop_assert_eq!(s.cycle_size(), 8.0 * size as f64);
        prop_assert_eq!(s.event_index(), 1);
    }

    #[test]
    fn prop_deterministic(waveform in arb_waveform(), config in arb_config(), events in 1usize..300) {
        let a = values(&mut scheduler(waveform, config), events);
        let b = values(&mut scheduler(waveform, config), events);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_concat_hand_off_pattern(d1 in 0usize..6, d2 in 0usize..6, rounds in 1usize..4) {
        let a = ConcatEntry::cyclical(Waveform::Linear, CyclicalConfig::new(1.0, 0.0, 4.0), EventDuration::Events(d1))
            .unwrap();
        let b = ConcatEntry::cyclical(Waveform::Cosine, CyclicalConfig::new(0.0, 1.0, 4.0), EventDuration::Events(d2))
            .unwrap();
        let mut s = ConcatScheduler::new(ParamGroups::single("lr", 0.0), "lr", vec![a, b]).unwrap();
        let mut state = EngineState::new();

        let period = d1 + d2 + 2;
        for invocation in 0..rounds * period {
            s.apply(&mut state).unwrap();
            let expected = if invocation % period <= d1 { 0 } else { 1 };
            prop_assert_eq!(s.active_entry(), Some(expected));
        }
        prop_assert_eq!(s.switches(), 2 * rounds);
    }
}
