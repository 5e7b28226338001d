//! End-to-end test: a registered signature matches itself and gains weight.

use keel_patterns::{PatternMatcher, PatternRegistry, Signature};
use keel_types::{PatternConfig, Sample};

#[test]
fn registered_signature_matches_itself() {
    let config = PatternConfig::default();
    let mut registry = PatternRegistry::new(config.clone(), 4).unwrap();
    let matcher = PatternMatcher::new(&config).unwrap();

    let s1 = Signature::from_sample(&Sample::new(vec![0.95, 0.4, 0.7, 0.1]), config.signature_levels);
    let id = registry.register(s1.clone()).unwrap();
    let weight_before = registry.get(id).unwrap().weight;

    let found = matcher.find_match(&mut registry, &s1).unwrap().unwrap();
    assert_eq!(found.pattern_id, id);
    assert!((found.similarity - 1.0).abs() < 1e-9);
    assert!(registry.get(id).unwrap().weight > weight_before);
}

#[test]
fn repeated_matches_converge_toward_similarity() {
    let config = PatternConfig::default();
    let mut registry = PatternRegistry::new(config.clone(), 2).unwrap();
    let matcher = PatternMatcher::new(&config).unwrap();

    let s = Signature::new(vec![120, 30]);
    let id = registry.register(s.clone()).unwrap();
    for _ in 0..50 {
        matcher.find_match(&mut registry, &s).unwrap();
    }
    let p = registry.get(id).unwrap();
    assert_eq!(p.match_count, 50);
    assert!(p.weight > 0.99 && p.weight <= 1.0);
}

#[test]
fn facade_learns_and_recognizes_a_state() {
    use keel_engine::DetectionFacade;
    use keel_types::EngineConfig;

    let mut facade = DetectionFacade::new(EngineConfig::with_dimensions(4)).unwrap();
    let state = Sample::new(vec![0.9, 0.85, 0.95, 0.9]);
    let first = facade.process_at(&state, 0).unwrap();
    let second = facade.process_at(&state, 1).unwrap();
    assert!(first.matched_pattern_id().is_none());
    assert_eq!(second.matched_pattern_id(), Some(0));
}
