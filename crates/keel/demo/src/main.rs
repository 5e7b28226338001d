#![deny(unsafe_code)]
//! Keel demo binary.
//!
//! Runs a self-contained demonstration of:
//! 1. configuration loading from YAML
//! 2. direct facade cycles over healthy, degrading and collapsed workloads
//! 3. correlation pairing and measurement
//! 4. the tokio-hosted detection worker fed by a concurrent producer
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod workload;

use std::time::Duration;

use anyhow::Context;
use keel_engine::{DetectionFacade, DetectionWorker, EngineSnapshot, SampleQueue};
use keel_types::{DetectionResult, EngineConfig, KeelError};
use tracing_subscriber::EnvFilter;

use workload::SimulatedWorkload;

const DEMO_CONFIG: &str = r#"
dimension_count: 4
history_capacity: 16
check_interval_ms: 100
queue_capacity: 32
stability:
  retain_weight: 0.6
  critical_threshold: 0.3
forecast:
  lookback: 4
patterns:
  max_patterns: 16
"#;

// ── Formatting Helpers ──────────────────────────────────────────────────

fn section(title: &str) {
    println!();
    println!(" ── {} {}", title, "─".repeat(56usize.saturating_sub(title.len())));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn info(msg: &str) {
    println!("   [--]  {}", msg);
}

fn warn(msg: &str) {
    println!("   [!!]  {}", msg);
}

fn print_result(label: &str, result: &DetectionResult) {
    let matched = result
        .matched_pattern_id()
        .map(|id| format!("pattern:{id}"))
        .unwrap_or_else(|| "-".into());
    info(&format!(
        "{label:<12} risk={:<8} confidence={:.3}  match={matched}",
        result.risk_level().to_string(),
        result.confidence(),
    ));
}

fn print_snapshot(snap: &EngineSnapshot) {
    info(&format!("Engine           : {}", snap.engine_id));
    info(&format!("Aggregate        : {:.4}", snap.aggregate));
    info(&format!("States           : {:?}", snap.states));
    info(&format!("Recalibrations   : {}", snap.recalibrations));
    info(&format!(
        "Patterns         : {} (evicted {})",
        snap.pattern_count, snap.pattern_evictions
    ));
    info(&format!("Active pairs     : {}", snap.active_pairs));
    info(&format!(
        "Interventions    : {} ({:.1}% successful, mean gain {:.4})",
        snap.interventions.total,
        snap.interventions.success_rate * 100.0,
        snap.interventions.mean_gain
    ));
    info(&format!(
        "Cycles           : {} processed, {} rejected",
        snap.cycles_processed, snap.cycles_rejected
    ));
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // ── Phase A: Configuration ──────────────────────────────────────
    section("Phase A: Configuration");

    let config = EngineConfig::from_yaml_str(DEMO_CONFIG).context("demo configuration")?;
    ok(&format!(
        "dimensions={}  history={}  interval={}ms  threshold={:.4}",
        config.dimension_count,
        config.history_capacity,
        config.check_interval_ms,
        config.cascade.intervention_threshold
    ));

    // ── Phase B: Direct cycles ──────────────────────────────────────
    section("Phase B: Facade Cycles");

    let mut facade = DetectionFacade::new(config.clone())?;
    let mut workload = SimulatedWorkload::new(config.dimension_count, 7);

    let pair = facade.pair_dimensions(0, 1)?;
    ok(&format!("Paired dimensions 0 and 1 as {pair}"));

    for step in 0..3 {
        let result = facade.process(&workload.healthy())?;
        print_result(&format!("healthy {step}"), &result);
    }
    for step in 0..8 {
        match facade.process(&workload.degrading(step)) {
            Ok(result) => print_result(&format!("degrade {step}"), &result),
            Err(e) => warn(&format!("degrade {step}  {e}")),
        }
        for event in facade.last_events() {
            info(&format!(
                "             event dim={} p={:.3} severity={:.3} eta={:.1}",
                event.dimension, event.probability, event.severity, event.estimated_time
            ));
        }
    }

    match facade.process(&workload.collapsed()) {
        Err(KeelError::InsufficientStability { aggregate, floor }) => warn(&format!(
            "collapse     rejected: aggregate {aggregate:.3} below floor {floor:.3}"
        )),
        Err(e) => warn(&format!("collapse     {e}")),
        Ok(result) => print_result("collapse", &result),
    }

    let strength = facade.measure_correlation(pair)?;
    info(&format!("Correlation {pair} strength {strength:.4}"));
    facade.unpair_dimensions(pair)?;

    print_snapshot(&facade.snapshot());

    // ── Phase C: Worker ─────────────────────────────────────────────
    section("Phase C: Detection Worker");

    let queue = SampleQueue::new(config.queue_capacity)?;
    let worker = DetectionWorker::spawn(DetectionFacade::new(config.clone())?, queue.clone());
    let mut outcomes = worker.subscribe();

    let producer = {
        let queue = queue.clone();
        let dimensions = config.dimension_count;
        tokio::spawn(async move {
            let mut workload = SimulatedWorkload::new(dimensions, 11);
            for step in 0..20 {
                let sample = if step < 10 {
                    workload.healthy()
                } else {
                    workload.degrading(step - 10)
                };
                if let Err(e) = queue.push(sample) {
                    tracing::warn!(error = %e, "Producer push failed");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(40)).await;
            }
        })
    };

    let reporter = tokio::spawn(async move {
        let mut accepted = 0usize;
        let mut rejected = 0usize;
        while let Ok(outcome) = outcomes.recv().await {
            match outcome {
                Ok(_) => accepted += 1,
                Err(_) => rejected += 1,
            }
        }
        (accepted, rejected)
    });

    producer.await.context("producer task")?;
    tokio::time::sleep(Duration::from_millis(u64::from(config.check_interval_ms) * 2)).await;

    let facade = worker.stop().await?;
    let (accepted, rejected) = reporter.await.context("reporter task")?;
    let dropped = queue.dropped()?;
    ok(&format!(
        "Worker stopped  outcomes: {accepted} accepted, {rejected} rejected, {dropped} dropped"
    ));
    print_snapshot(&facade.snapshot());

    println!();
    println!("{}", serde_json::to_string_pretty(&facade.snapshot())?);
    Ok(())
}
