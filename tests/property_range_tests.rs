use std::time::Duration;

use indexmap::IndexMap;
use navchart::api::{RangeAnimationConfig, RangeEngine, percentages_of};
use navchart::core::{SeriesId, Transition, TransitionStep};
use proptest::prelude::*;

proptest! {
    #[test]
    fn rounded_percentages_stay_near_one_hundred(
        values in prop::collection::vec(0i64..10_000, 1..12)
    ) {
        prop_assume!(values.iter().sum::<i64>() > 0);
        let input: IndexMap<SeriesId, i64> = values
            .iter()
            .enumerate()
            .map(|(i, value)| (SeriesId(i), *value))
            .collect();
        let shares = percentages_of(&input);
        let total: i64 = shares.values().sum();
        prop_assert!((99..=101).contains(&total), "total={total} for {values:?}");
        prop_assert!(shares.values().all(|share| (0..=100).contains(share)));
        prop_assert_eq!(shares.len(), values.len());
    }

    #[test]
    fn transitions_move_monotonically_toward_the_target(
        from in -1_000_000.0f64..1_000_000.0,
        to in -1_000_000.0f64..1_000_000.0,
        mut fractions in prop::collection::vec(0.0f64..1.0, 1..20)
    ) {
        fractions.sort_by(f64::total_cmp);
        let mut transition = Transition::new(from, to, Duration::from_millis(200));
        let direction = (to - from).signum();
        let mut previous = from;

        for fraction in fractions {
            let value = match transition.set_fraction(fraction) {
                Some(TransitionStep::Running { value, .. }) => value,
                Some(TransitionStep::Completed(value)) => value,
                None => break,
            };
            prop_assert!((value - previous) * direction >= -1e-6);
            previous = value;
        }
        prop_assert_eq!(transition.set_fraction(1.0), Some(TransitionStep::Completed(to)));
    }

    #[test]
    fn range_engine_settles_on_the_last_request(
        requests in prop::collection::vec((1i64..5_000, 0u64..250), 1..16)
    ) {
        let mut engine = RangeEngine::new(RangeAnimationConfig::default(), true).expect("range engine");
        engine.update_target(0, 2_500);
        engine.mark_drawn();

        let mut last = 2_500;
        for (max, elapsed_ms) in requests {
            engine.update_target(0, max);
            engine.advance(Duration::from_millis(elapsed_ms));
            last = max;
        }
        for _ in 0..4 {
            engine.advance(Duration::from_secs(1));
        }

        prop_assert!(!engine.is_animating());
        prop_assert_eq!(engine.pending_target(), None);
        let settled = engine.settled().expect("settled");
        prop_assert_eq!((settled.min, settled.max), (0, last));
        prop_assert_eq!(engine.domain().expect("domain").max, last as f64);
    }

    #[test]
    fn interpolated_domain_stays_between_endpoints(
        start in 1i64..100_000,
        target in 1i64..100_000,
        fraction in 0.0f64..1.0
    ) {
        let mut engine = RangeEngine::new(RangeAnimationConfig::default(), true).expect("range engine");
        engine.update_target(0, start);
        engine.mark_drawn();
        engine.update_target(0, target);
        engine.tick(fraction);

        let max = engine.domain().expect("domain").max;
        let (low, high) = if start <= target { (start, target) } else { (target, start) };
        prop_assert!(max >= low as f64 - 1e-6 && max <= high as f64 + 1e-6);
    }
}
