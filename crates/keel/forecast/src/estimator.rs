//! Trend extrapolation over per-dimension score history.
//!
//! For each dimension the last `lookback` records yield:
//! - `instability = 1 - mean(score)`, used as the event probability
//! - `velocity`, the mean first difference, whose magnitude is the severity
//! - `time_to_event = 1 / (probability * severity + epsilon)`
//!
//! Only dimensions with `probability > emit_threshold` produce an event.

use std::cmp::Ordering;

use keel_history::RingBuffer;
use keel_types::{ForecastConfig, HistoryRecord, KeelResult, PredictedEvent};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw trend figures for one dimension, before filtering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendEstimate {
    pub dimension: usize,
    /// `1 - mean(score)` over the window, clamped to [0.0, 1.0].
    pub instability: f64,
    /// Mean first difference across consecutive records.
    pub velocity: f64,
    /// Number of records in the window.
    pub window: usize,
}

impl TrendEstimate {
    pub fn severity(&self) -> f64 {
        self.velocity.abs()
    }
}

/// Forecasts stability failures from score history.
#[derive(Debug, Clone)]
pub struct PredictiveRiskEstimator {
    config: ForecastConfig,
}

impl PredictiveRiskEstimator {
    pub fn new(config: ForecastConfig) -> KeelResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: ForecastConfig::default(),
        }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Trend figures for one window of records (oldest first).
    pub fn estimate(&self, dimension: usize, records: &[HistoryRecord]) -> Option<TrendEstimate> {
        if records.is_empty() {
            return None;
        }
        let start = records.len().saturating_sub(self.config.lookback);
        let window = &records[start..];

        let mean = window.iter().map(|r| r.value).sum::<f64>() / window.len() as f64;
        let velocity = if window.len() < 2 {
            0.0
        } else {
            let diffs: f64 = window.windows(2).map(|w| w[1].value - w[0].value).sum();
            diffs / (window.len() - 1) as f64
        };

        Some(TrendEstimate {
            dimension,
            instability: (1.0 - mean).clamp(0.0, 1.0),
            velocity,
            window: window.len(),
        })
    }

    /// Trend figures for every non-empty history, indexed by dimension.
    pub fn estimate_all(&self, histories: &[RingBuffer<HistoryRecord>]) -> Vec<TrendEstimate> {
        histories
            .iter()
            .enumerate()
            .filter_map(|(dimension, history)| {
                let records = history.last_n(self.config.lookback);
                self.estimate(dimension, &records)
            })
            .collect()
    }

    /// Predicted events, by descending severity then ascending dimension.
    pub fn evaluate(&self, histories: &[RingBuffer<HistoryRecord>]) -> Vec<PredictedEvent> {
        let mut events: Vec<PredictedEvent> = self
            .estimate_all(histories)
            .into_iter()
            .filter(|e| e.instability > self.config.emit_threshold)
            .map(|e| self.to_event(&e))
            .collect();

        events.sort_by(|a, b| {
            b.severity
                .partial_cmp(&a.severity)
                .unwrap_or(Ordering::Equal)
                .then(a.dimension.cmp(&b.dimension))
        });

        if !events.is_empty() {
            debug!(
                count = events.len(),
                top_dimension = events[0].dimension,
                top_probability = events[0].probability,
                "Predicted instability events"
            );
        }
        events
    }

    fn to_event(&self, estimate: &TrendEstimate) -> PredictedEvent {
        let probability = estimate.instability;
        let severity = estimate.severity();
        let estimated_time = 1.0 / (probability * severity + self.config.epsilon);
        PredictedEvent::new(estimate.dimension, probability, severity, estimated_time)
    }
}

impl Default for PredictiveRiskEstimator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
