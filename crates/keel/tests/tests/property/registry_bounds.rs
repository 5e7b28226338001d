//! Property tests: the pattern registry stays within capacity and always
//! admits the newest registration.

use keel_patterns::{PatternMatcher, PatternRegistry, Signature};
use keel_types::PatternConfig;
use proptest::prelude::*;

const SIGNATURE_LEN: usize = 4;

fn arb_signature() -> impl Strategy<Value = Signature> {
    proptest::collection::vec(any::<u8>(), SIGNATURE_LEN).prop_map(Signature::new)
}

proptest! {
    /// len() <= max_patterns after every register, and the new id is present.
    #[test]
    fn registry_never_exceeds_capacity(
        max_patterns in 1usize..20,
        signatures in proptest::collection::vec(arb_signature(), 1..60),
    ) {
        let config = PatternConfig { max_patterns, ..PatternConfig::default() };
        let mut registry = PatternRegistry::new(config, SIGNATURE_LEN).unwrap();
        for signature in signatures {
            let id = registry.register(signature).unwrap();
            prop_assert!(registry.len() <= max_patterns);
            prop_assert!(registry.get(id).is_some());
        }
    }

    /// Interleaved matching keeps weights in [0, 1] and the bound intact.
    #[test]
    fn matching_keeps_weights_bounded(
        max_patterns in 1usize..10,
        signatures in proptest::collection::vec(arb_signature(), 1..40),
    ) {
        let config = PatternConfig { max_patterns, ..PatternConfig::default() };
        let matcher = PatternMatcher::new(&config).unwrap();
        let mut registry = PatternRegistry::new(config, SIGNATURE_LEN).unwrap();
        for signature in signatures {
            if matcher.find_match(&mut registry, &signature).unwrap().is_none() {
                registry.register(signature).unwrap();
            }
            prop_assert!(registry.len() <= max_patterns);
            prop_assert!(registry.iter().all(|p| (0.0..=1.0).contains(&p.weight)));
        }
    }
}
