//! Cascade prevention controller.
//!
//! Every dimension has a barrier gain in `[0, max_gain]`. A predicted event
//! above the intervention threshold reinforces its dimension's barrier and
//! propagates a small positive cross-term to every other dimension.

use keel_history::RingBuffer;
use keel_types::{
    CascadeConfig, InterventionRecord, KeelError, KeelResult, PredictedEvent,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Summary of one `intervene` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionResult {
    /// Interventions whose gain moved the barrier.
    pub successful_interventions: usize,
    /// Mean gain actually applied across the interventions performed.
    pub mean_gain: f64,
    /// Mean probability across every event considered.
    pub mean_predicted_probability: f64,
    /// Events considered.
    pub considered: usize,
    /// Events at or below the threshold (counted, not acted upon).
    pub skipped_below_threshold: usize,
}

/// Aggregate figures over the intervention log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InterventionStats {
    pub total: usize,
    pub successful: usize,
    pub success_rate: f64,
    pub mean_gain: f64,
}

/// Decides and applies bounded interventions on predicted events.
#[derive(Debug, Clone)]
pub struct CascadeController {
    config: CascadeConfig,
    barriers: Vec<f64>,
    log: RingBuffer<InterventionRecord>,
}

impl CascadeController {
    pub fn new(config: CascadeConfig, dimension_count: usize) -> KeelResult<Self> {
        config.validate()?;
        if dimension_count == 0 {
            return Err(KeelError::InvalidConfiguration(
                "cascade controller needs at least one dimension".into(),
            ));
        }
        let log = RingBuffer::new(config.log_capacity)?;
        Ok(Self {
            config,
            barriers: vec![0.0; dimension_count],
            log,
        })
    }

    /// Act on every event whose probability exceeds the threshold.
    ///
    /// Fails before any mutation if an event names an unknown dimension.
    pub fn intervene(
        &mut self,
        events: &[PredictedEvent],
        timestamp_ms: i64,
    ) -> KeelResult<InterventionResult> {
        let count = self.barriers.len();
        if let Some(bad) = events.iter().find(|e| e.dimension >= count) {
            return Err(KeelError::DimensionOutOfRange {
                dimension: bad.dimension,
                count,
            });
        }

        let mut result = InterventionResult {
            considered: events.len(),
            ..InterventionResult::default()
        };
        if events.is_empty() {
            return Ok(result);
        }

        let max_gain = self.config.max_gain;
        let mut probability_sum = 0.0;
        let mut applied_sum = 0.0;
        let mut performed = 0usize;

        for event in events {
            probability_sum += event.probability;
            if event.probability <= self.config.intervention_threshold {
                result.skipped_below_threshold += 1;
                continue;
            }

            let gain = self.gain_for(event.probability);
            let before = self.barriers[event.dimension];
            let after = (before + gain).clamp(0.0, max_gain);
            let applied = after - before;
            self.barriers[event.dimension] = after;

            let cross = gain * self.config.cross_coupling;
            for (dimension, barrier) in self.barriers.iter_mut().enumerate() {
                if dimension != event.dimension {
                    *barrier = (*barrier + cross).clamp(0.0, max_gain);
                }
            }

            let record = InterventionRecord {
                timestamp_ms,
                dimension: event.dimension,
                gain_applied: applied,
                resulting_strength: after,
            };
            self.log.push(record);

            performed += 1;
            applied_sum += applied;
            if record.is_successful() {
                result.successful_interventions += 1;
            } else {
                warn!(
                    dimension = event.dimension,
                    barrier = after,
                    "Intervention had no effect: barrier saturated"
                );
            }
            debug!(
                dimension = event.dimension,
                probability = event.probability,
                gain,
                applied,
                barrier = after,
                "Intervention applied"
            );
        }

        result.mean_predicted_probability = probability_sum / events.len() as f64;
        if performed > 0 {
            result.mean_gain = applied_sum / performed as f64;
        }
        Ok(result)
    }

    /// `base_gain * (1 + enhancement * (1 - probability))`.
    pub fn gain_for(&self, probability: f64) -> f64 {
        self.config.base_gain * (1.0 + self.config.enhancement * (1.0 - probability))
    }

    /// Relax every barrier one step toward zero.
    pub fn relax(&mut self) {
        let factor = self.config.relaxation;
        for barrier in &mut self.barriers {
            *barrier = (*barrier * factor).clamp(0.0, self.config.max_gain);
        }
    }

    /// Success metrics over the bounded log.
    pub fn stats(&self) -> InterventionStats {
        let total = self.log.len();
        if total == 0 {
            return InterventionStats::default();
        }
        let successful = self.log.iter().filter(|r| r.is_successful()).count();
        let gain_sum: f64 = self.log.iter().map(|r| r.gain_applied).sum();
        InterventionStats {
            total,
            successful,
            success_rate: successful as f64 / total as f64,
            mean_gain: gain_sum / total as f64,
        }
    }

    pub fn barrier(&self, dimension: usize) -> Option<f64> {
        self.barriers.get(dimension).copied()
    }

    pub fn barriers(&self) -> &[f64] {
        &self.barriers
    }

    /// Intervention log, oldest first.
    pub fn log(&self) -> Vec<InterventionRecord> {
        self.log.snapshot()
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }
}
