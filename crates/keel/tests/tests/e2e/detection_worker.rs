//! End-to-end test: the worker drains the queue on its cadence, publishes
//! outcomes and hands the facade back on stop.

use std::time::Duration;

use keel_engine::{DetectionFacade, DetectionWorker, SampleQueue};
use keel_tests::uniform_sample;
use keel_types::{EngineConfig, KeelError};

fn config() -> EngineConfig {
    let mut config = EngineConfig::with_dimensions(3);
    config.check_interval_ms = 50;
    config.queue_capacity = 4;
    config
}

#[tokio::test(start_paused = true)]
async fn worker_processes_and_stops_cleanly() {
    let config = config();
    let queue = SampleQueue::new(config.queue_capacity).unwrap();
    let worker = DetectionWorker::spawn(DetectionFacade::new(config).unwrap(), queue.clone());
    let mut outcomes = worker.subscribe();

    // First tick fires immediately; later samples wait for the next one.
    tokio::time::sleep(Duration::from_millis(10)).await;
    for _ in 0..3 {
        queue.push(uniform_sample(3, 0.9)).unwrap();
    }
    tokio::time::sleep(Duration::from_millis(60)).await;

    let mut matched = 0;
    for _ in 0..3 {
        let result = outcomes.recv().await.unwrap().unwrap();
        if result.matched_pattern_id().is_some() {
            matched += 1;
        }
    }
    assert_eq!(matched, 2);

    let facade = worker.stop().await.unwrap();
    let snap = facade.snapshot();
    assert_eq!(snap.cycles_processed, 3);
    assert_eq!(snap.pattern_count, 1);
}

#[tokio::test(start_paused = true)]
async fn overflow_drops_oldest_before_processing() {
    let config = config();
    let queue = SampleQueue::new(config.queue_capacity).unwrap();
    for i in 0..6 {
        queue.push(uniform_sample(3, 0.5 + i as f64 * 0.05)).unwrap();
    }
    assert_eq!(queue.dropped().unwrap(), 2);

    let worker = DetectionWorker::spawn(DetectionFacade::new(config).unwrap(), queue.clone());
    tokio::time::sleep(Duration::from_millis(10)).await;

    let facade = worker.stop().await.unwrap();
    assert_eq!(facade.snapshot().cycles_processed, 4);
    assert!(queue.is_empty().unwrap());
}

#[tokio::test(start_paused = true)]
async fn rejected_cycles_reach_subscribers() {
    let mut config = config();
    config.stability.retain_weight = 0.0;
    let queue = SampleQueue::new(config.queue_capacity).unwrap();
    let worker = DetectionWorker::spawn(DetectionFacade::new(config).unwrap(), queue.clone());
    let mut outcomes = worker.subscribe();

    queue.push(uniform_sample(3, 0.0)).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let outcome = outcomes.recv().await.unwrap();
    assert!(matches!(
        outcome,
        Err(KeelError::InsufficientStability { .. })
    ));

    let facade = worker.stop().await.unwrap();
    assert_eq!(facade.snapshot().cycles_rejected, 1);
}

#[tokio::test(start_paused = true)]
async fn idle_worker_decays_stability() {
    let config = config();
    let queue = SampleQueue::new(config.queue_capacity).unwrap();
    let worker = DetectionWorker::spawn(DetectionFacade::new(config).unwrap(), queue);

    tokio::time::sleep(Duration::from_millis(500)).await;
    let facade = worker.stop().await.unwrap();
    let snap = facade.snapshot();
    assert_eq!(snap.cycles_processed, 0);
    assert!(snap.aggregate < 1.0);
    assert!(snap.aggregate > 0.9);
}
