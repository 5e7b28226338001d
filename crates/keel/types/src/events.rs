use serde::{Deserialize, Serialize};

/// One timestamped score in a dimension's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Millis since epoch.
    pub timestamp_ms: i64,
    pub value: f64,
}

impl HistoryRecord {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self { timestamp_ms, value }
    }
}

/// Forecast of an impending stability failure for one dimension.
///
/// Produced per evaluation cycle and consumed by the cascade controller
/// within the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedEvent {
    pub dimension: usize,
    /// Probability in [0.0, 1.0].
    pub probability: f64,
    /// Magnitude of the score trend (>= 0).
    pub severity: f64,
    /// Estimated cycles until the event.
    pub estimated_time: f64,
}

impl PredictedEvent {
    pub fn new(dimension: usize, probability: f64, severity: f64, estimated_time: f64) -> Self {
        Self {
            dimension,
            probability: probability.clamp(0.0, 1.0),
            severity: severity.max(0.0),
            estimated_time,
        }
    }
}

/// A corrective action applied to one dimension's barrier gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionRecord {
    /// Millis since epoch.
    pub timestamp_ms: i64,
    pub dimension: usize,
    /// Gain actually added to the barrier after clamping.
    pub gain_applied: f64,
    /// Barrier gain after the intervention.
    pub resulting_strength: f64,
}

impl InterventionRecord {
    /// An intervention succeeds when it moved the barrier.
    pub fn is_successful(&self) -> bool {
        self.gain_applied > 0.0
    }
}
