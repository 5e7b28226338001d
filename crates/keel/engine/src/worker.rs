//! Detection worker: one tokio task that exclusively owns a facade.
//!
//! Every `check_interval_ms` the task drains the sample queue in FIFO order
//! and processes each sample; an empty queue becomes an idle tick. Outcomes
//! are published on a broadcast channel. Stopping takes effect between
//! cycles and hands the facade back.

use std::time::Duration;

use keel_types::{DetectionResult, KeelResult};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::facade::DetectionFacade;
use crate::queue::SampleQueue;

/// Result of one processed sample, as published to subscribers.
pub type CycleOutcome = KeelResult<DetectionResult>;

/// Outcome channel depth. Slow subscribers observe `Lagged`.
const OUTCOME_CHANNEL_CAPACITY: usize = 256;

/// Spawns the detection loop.
pub struct DetectionWorker;

impl DetectionWorker {
    /// Start the loop on the current tokio runtime.
    pub fn spawn(facade: DetectionFacade, queue: SampleQueue) -> WorkerHandle {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let (outcome_tx, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        let publisher = outcome_tx.clone();

        let period = Duration::from_millis(u64::from(facade.config().check_interval_ms));
        let engine = facade.id();
        info!(engine = %engine, interval_ms = period.as_millis() as u64, "Detection worker started");

        let task = tokio::spawn(async move {
            let mut facade = facade;
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.recv() => {
                        debug!(engine = %engine, "Detection worker stop requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        run_cycle(&mut facade, &queue, &publisher);
                    }
                }
            }

            info!(
                engine = %engine,
                processed = facade.snapshot().cycles_processed,
                rejected = facade.snapshot().cycles_rejected,
                "Detection worker stopped"
            );
            facade
        });

        WorkerHandle {
            task,
            stop: stop_tx,
            outcomes: outcome_tx,
        }
    }
}

fn run_cycle(
    facade: &mut DetectionFacade,
    queue: &SampleQueue,
    publisher: &broadcast::Sender<CycleOutcome>,
) {
    let samples = match queue.drain() {
        Ok(samples) => samples,
        Err(e) => {
            warn!(error = %e, "Sample queue unavailable, skipping cycle");
            return;
        }
    };

    if samples.is_empty() {
        facade.idle_tick();
        return;
    }

    for sample in &samples {
        let outcome = facade.process(sample);
        // No subscribers is not an error.
        let _ = publisher.send(outcome);
    }
}

/// Handle to a running detection worker.
pub struct WorkerHandle {
    task: JoinHandle<DetectionFacade>,
    stop: mpsc::Sender<()>,
    outcomes: broadcast::Sender<CycleOutcome>,
}

impl WorkerHandle {
    /// Receive every outcome published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CycleOutcome> {
        self.outcomes.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop between cycles and return the facade.
    pub async fn stop(self) -> EngineResult<DetectionFacade> {
        // A closed channel means the task is already gone; the join reports it.
        let _ = self.stop.send(()).await;
        self.task.await.map_err(|_| EngineError::WorkerStopped)
    }
}
