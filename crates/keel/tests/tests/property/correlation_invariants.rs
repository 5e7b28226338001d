//! Property tests: correlation strength is symmetric, bounded and decays
//! monotonically under repeated measurement.

use keel_correlation::CorrelationMatrix;
use keel_types::{CorrelationConfig, Sample};
use proptest::prelude::*;

const DIMENSIONS: usize = 6;

fn arb_pair() -> impl Strategy<Value = (usize, usize)> {
    (0..DIMENSIONS, 0..DIMENSIONS).prop_filter("distinct dimensions", |(a, b)| a != b)
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    proptest::collection::vec(0.0f64..=1.0, DIMENSIONS).prop_map(Sample::new)
}

proptest! {
    /// strength(a, b) == strength(b, a) after any pairing and observation sequence.
    #[test]
    fn strength_is_symmetric(
        pairs in proptest::collection::vec(arb_pair(), 1..10),
        samples in proptest::collection::vec(arb_sample(), 0..10),
    ) {
        let mut matrix = CorrelationMatrix::new(CorrelationConfig::default(), DIMENSIONS).unwrap();
        for (a, b) in &pairs {
            let forward = matrix.pair(*a, *b).unwrap();
            let backward = matrix.pair(*b, *a).unwrap();
            prop_assert_eq!(forward, backward);
        }
        for window in samples.windows(2) {
            matrix.observe(&window[0], &window[1]).unwrap();
        }
        for (a, b) in &pairs {
            let ab = matrix.strength_between(*a, *b);
            let ba = matrix.strength_between(*b, *a);
            prop_assert_eq!(ab, ba);
            let s = ab.unwrap();
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }

    /// Repeated measurement never increases strength.
    #[test]
    fn measure_is_non_increasing(
        (a, b) in arb_pair(),
        decay in 0.0f64..=1.0,
        rounds in 1usize..50,
    ) {
        let config = CorrelationConfig { decay_factor: decay, ..CorrelationConfig::default() };
        let mut matrix = CorrelationMatrix::new(config, DIMENSIONS).unwrap();
        let id = matrix.pair(a, b).unwrap();
        let mut previous = matrix.measure(id).unwrap();
        for _ in 0..rounds {
            let current = matrix.measure(id).unwrap();
            prop_assert!(current <= previous);
            prop_assert!(current >= 0.0);
            previous = current;
        }
    }

    /// Active pairs never exceed max_pairs.
    #[test]
    fn pair_count_is_bounded(
        max_pairs in 1usize..8,
        pairs in proptest::collection::vec(arb_pair(), 0..30),
    ) {
        let config = CorrelationConfig { max_pairs, ..CorrelationConfig::default() };
        let mut matrix = CorrelationMatrix::new(config, DIMENSIONS).unwrap();
        for (a, b) in pairs {
            let _ = matrix.pair(a, b);
            prop_assert!(matrix.len() <= max_pairs);
        }
    }
}
