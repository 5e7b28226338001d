//! End-to-end test: cycles below the operational floor produce no result.

use keel_engine::DetectionFacade;
use keel_tests::{responsive_config, uniform_sample};
use keel_types::{EngineConfig, KeelError};

#[test]
fn collapse_is_rejected() {
    let mut facade = DetectionFacade::new(responsive_config(3)).unwrap();
    let err = facade.process_at(&uniform_sample(3, 0.05), 0).unwrap_err();
    assert!(err.is_recoverable());
    match err {
        KeelError::InsufficientStability { aggregate, floor } => {
            assert!(aggregate < floor);
            assert_eq!(floor, 0.4);
        }
        other => panic!("unexpected error: {other}"),
    }

    let snap = facade.snapshot();
    assert_eq!(snap.cycles_processed, 0);
    assert_eq!(snap.cycles_rejected, 1);
    assert_eq!(snap.pattern_count, 0);
    assert_eq!(snap.interventions.total, 0);
}

#[test]
fn engine_recovers_after_rejection() {
    let mut facade = DetectionFacade::new(responsive_config(3)).unwrap();
    assert!(facade.process_at(&uniform_sample(3, 0.0), 0).is_err());

    // The critical state recalibrates on the next sample.
    let result = facade.process_at(&uniform_sample(3, 0.9), 1).unwrap();
    assert!(result.confidence() < 0.4);
    assert_eq!(facade.snapshot().recalibrations, 1);
}

#[test]
fn mismatched_sample_is_rejected() {
    let mut facade = DetectionFacade::new(responsive_config(3)).unwrap();
    assert!(matches!(
        facade.process_at(&uniform_sample(2, 0.9), 0),
        Err(KeelError::DimensionMismatch { expected: 3, actual: 2 })
    ));
}

#[test]
fn total_failure_under_default_config_is_rejected() {
    let mut facade = DetectionFacade::new(EngineConfig::with_dimensions(3)).unwrap();
    let mut rejected = 0;
    let mut min_aggregate = f64::MAX;
    for ts in 0..100 {
        match facade.process_at(&uniform_sample(3, 0.0), ts) {
            Ok(_) => {}
            Err(KeelError::InsufficientStability { aggregate, .. }) => {
                rejected += 1;
                min_aggregate = min_aggregate.min(aggregate);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    // Each run of nine zero samples ends in one rejected cycle and a recalibration.
    assert!(rejected >= 10, "rejected {rejected} of 100 cycles");
    assert!(min_aggregate < 0.4);
    assert_eq!(facade.snapshot().cycles_rejected, rejected);
}
