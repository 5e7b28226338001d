//! End-to-end test: predicted events drive bounded barrier reinforcement.

use keel_cascade::CascadeController;
use keel_forecast::PredictiveRiskEstimator;
use keel_tests::history_of;
use keel_types::{CascadeConfig, PredictedEvent};

#[test]
fn one_event_one_intervention() {
    let mut controller = CascadeController::new(
        CascadeConfig {
            intervention_threshold: 0.382,
            ..CascadeConfig::default()
        },
        4,
    )
    .unwrap();

    let result = controller
        .intervene(&[PredictedEvent::new(2, 0.9, 0.1, 3.0)], 1_000)
        .unwrap();

    let log = controller.log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].dimension, 2);
    assert!(log[0].gain_applied > 0.0);
    assert_eq!(result.successful_interventions, 1);
    assert_eq!(controller.stats().success_rate, 1.0);
}

#[test]
fn forecast_feeds_controller() {
    let estimator = PredictiveRiskEstimator::with_defaults();
    let mut controller = CascadeController::new(CascadeConfig::default(), 2).unwrap();

    let events = estimator.evaluate(&[
        history_of(&[0.9, 0.9, 0.9]),
        history_of(&[0.6, 0.4, 0.2, 0.1]),
    ]);
    let result = controller.intervene(&events, 0).unwrap();
    assert_eq!(result.considered, 1);
    assert_eq!(result.successful_interventions, 1);
    assert!(controller.barrier(1).unwrap() > controller.barrier(0).unwrap());
    assert!(controller.barrier(0).unwrap() > 0.0);
}

#[test]
fn barriers_stay_bounded_under_pressure() {
    let mut controller = CascadeController::new(CascadeConfig::default(), 3).unwrap();
    let storm: Vec<PredictedEvent> = (0..3)
        .map(|d| PredictedEvent::new(d, 0.99, 0.5, 1.0))
        .collect();
    for ts in 0..200 {
        controller.intervene(&storm, ts).unwrap();
    }
    assert!(controller
        .barriers()
        .iter()
        .all(|b| (0.0..=1.0).contains(b)));
    assert!(controller.stats().success_rate < 1.0);
    assert_eq!(controller.log().len(), 256);
}
