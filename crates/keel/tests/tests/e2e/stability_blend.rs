//! End-to-end test: a sharp drop after a healthy run is smoothed by the blend.

use keel_stability::{DimensionState, StabilityTracker};
use keel_tests::uniform_sample;
use keel_types::StabilityConfig;

fn tracker() -> StabilityTracker {
    StabilityTracker::new(StabilityConfig::default(), 3, 4).unwrap()
}

#[test]
fn single_bad_sample_does_not_reach_critical() {
    let mut t = tracker();
    for i in 0..4 {
        t.update(&uniform_sample(3, 0.9), i).unwrap();
    }
    let before = t.aggregate();

    let outcome = t.update(&uniform_sample(3, 0.1), 4).unwrap();
    assert!(outcome.aggregate < before);
    assert!(outcome.aggregate > 0.0);
    assert!(!outcome.recalibrated);
    assert!(t
        .states()
        .iter()
        .all(|s| matches!(s, DimensionState::Stable | DimensionState::Degrading)));
    assert!(outcome
        .transitions
        .iter()
        .all(|tr| tr.to != DimensionState::Critical));
}

#[test]
fn history_keeps_only_the_latest_records() {
    let mut t = tracker();
    for i in 0..6 {
        t.update(&uniform_sample(3, 0.9), i).unwrap();
    }
    for history in t.histories() {
        assert_eq!(history.len(), 4);
        assert_eq!(history.snapshot()[0].timestamp_ms, 2);
    }
}

#[test]
fn sustained_failure_goes_critical_then_recalibrates() {
    let mut t = tracker();
    let mut ts = 0;
    while t.states().iter().all(|s| *s != DimensionState::Critical) {
        t.update(&uniform_sample(3, 0.0), ts).unwrap();
        ts += 1;
        assert!(ts < 100, "tracker never went critical");
    }

    let outcome = t.update(&uniform_sample(3, 0.0), ts).unwrap();
    assert!(outcome.recalibrated);
    assert_eq!(t.recalibrations(), 1);
    assert!(t.states().iter().all(|s| *s == DimensionState::Stable));
    assert!(t.aggregate() > 0.8);
}
