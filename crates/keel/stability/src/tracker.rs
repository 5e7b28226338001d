//! Per-dimension stability tracking.
//!
//! Each dimension carries a score in `[0, 1]` and a state:
//!
//! ```text
//!   Stable ──(< warn)──▶ Degrading ──(< critical)──▶ Critical
//!     ▲                                                 │ next update
//!     └──────────── recalibrate() ◀── Recalibrating ◀───┘
//! ```
//!
//! A dimension that turned `Critical` stays observable for the cycle that
//! produced it; the following `update` moves it to `Recalibrating`, which
//! resets the whole tracker to the baseline before the new sample is blended.

use keel_history::RingBuffer;
use keel_types::{HistoryRecord, KeelError, KeelResult, Sample, StabilityConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stability state of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionState {
    Stable,
    Degrading,
    Critical,
    Recalibrating,
}

impl std::fmt::Display for DimensionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Degrading => write!(f, "degrading"),
            Self::Critical => write!(f, "critical"),
            Self::Recalibrating => write!(f, "recalibrating"),
        }
    }
}

/// A state change of one dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub dimension: usize,
    pub from: DimensionState,
    pub to: DimensionState,
}

/// What one `update` did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Transitions in the order they happened.
    pub transitions: Vec<StateTransition>,
    /// Whether a recalibration ran before the sample was blended.
    pub recalibrated: bool,
    /// Aggregate after the update.
    pub aggregate: f64,
}

/// Tracks stability scores, their history and per-dimension state.
///
/// Construction fully initializes every dimension, so there is no
/// uninitialized tracker to recalibrate.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    config: StabilityConfig,
    scores: Vec<f64>,
    states: Vec<DimensionState>,
    histories: Vec<RingBuffer<HistoryRecord>>,
    weights: Vec<f64>,
    recalibrations: u64,
}

impl StabilityTracker {
    pub fn new(
        config: StabilityConfig,
        dimension_count: usize,
        history_capacity: usize,
    ) -> KeelResult<Self> {
        if dimension_count == 0 {
            return Err(KeelError::InvalidConfiguration(
                "dimension_count must be at least 1".into(),
            ));
        }
        config.validate(dimension_count)?;

        let histories = (0..dimension_count)
            .map(|_| RingBuffer::new(history_capacity))
            .collect::<KeelResult<Vec<_>>>()?;
        let weights = if config.weights.is_empty() {
            vec![1.0; dimension_count]
        } else {
            config.weights.clone()
        };

        Ok(Self {
            scores: vec![config.baseline; dimension_count],
            states: vec![DimensionState::Stable; dimension_count],
            histories,
            weights,
            recalibrations: 0,
            config,
        })
    }

    /// Blend a new sample into every dimension's score.
    pub fn update(&mut self, sample: &Sample, timestamp_ms: i64) -> KeelResult<UpdateOutcome> {
        sample.validate(self.scores.len())?;

        let mut transitions = Vec::new();
        let recalibrated = self.states.contains(&DimensionState::Critical);
        if recalibrated {
            for (dimension, state) in self.states.iter_mut().enumerate() {
                if *state == DimensionState::Critical {
                    *state = DimensionState::Recalibrating;
                    transitions.push(StateTransition {
                        dimension,
                        from: DimensionState::Critical,
                        to: DimensionState::Recalibrating,
                    });
                }
            }
            transitions.extend(self.recalibrate());
        }

        let retain = self.config.retain_weight;
        for (dimension, value) in sample.clamped().enumerate() {
            let blended = retain * self.scores[dimension] + (1.0 - retain) * value;
            let score = blended.clamp(0.0, 1.0);
            self.scores[dimension] = score;
            self.histories[dimension].push(HistoryRecord::new(timestamp_ms, score));
        }
        transitions.extend(self.reclassify());

        let aggregate = self.aggregate();
        debug!(
            aggregate,
            transitions = transitions.len(),
            recalibrated,
            "Stability updated"
        );

        Ok(UpdateOutcome {
            transitions,
            recalibrated,
            aggregate,
        })
    }

    /// Decay every score by one idle step (a cycle passed with no sample).
    pub fn tick(&mut self) -> Vec<StateTransition> {
        let decay = self.config.idle_decay;
        for score in &mut self.scores {
            *score = (*score * decay).clamp(0.0, 1.0);
        }
        self.reclassify()
    }

    /// Reset every score to the baseline, clear history, return to `Stable`.
    pub fn recalibrate(&mut self) -> Vec<StateTransition> {
        let mut transitions = Vec::new();
        for (dimension, state) in self.states.iter_mut().enumerate() {
            if *state != DimensionState::Stable {
                transitions.push(StateTransition {
                    dimension,
                    from: *state,
                    to: DimensionState::Stable,
                });
                *state = DimensionState::Stable;
            }
        }
        for score in &mut self.scores {
            *score = self.config.baseline;
        }
        for history in &mut self.histories {
            history.clear();
        }
        self.recalibrations += 1;
        info!(
            recalibrations = self.recalibrations,
            baseline = self.config.baseline,
            "Stability tracker recalibrated"
        );
        transitions
    }

    /// Weighted mean of all scores.
    pub fn aggregate(&self) -> f64 {
        let total_weight: f64 = self.weights.iter().sum();
        let weighted: f64 = self
            .scores
            .iter()
            .zip(&self.weights)
            .map(|(s, w)| s * w)
            .sum();
        (weighted / total_weight).clamp(0.0, 1.0)
    }

    pub fn score(&self, dimension: usize) -> Option<f64> {
        self.scores.get(dimension).copied()
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn state(&self, dimension: usize) -> Option<DimensionState> {
        self.states.get(dimension).copied()
    }

    pub fn states(&self) -> &[DimensionState] {
        &self.states
    }

    /// Per-dimension score history, indexed by dimension.
    pub fn histories(&self) -> &[RingBuffer<HistoryRecord>] {
        &self.histories
    }

    pub fn dimension_count(&self) -> usize {
        self.scores.len()
    }

    pub fn recalibrations(&self) -> u64 {
        self.recalibrations
    }

    pub fn config(&self) -> &StabilityConfig {
        &self.config
    }

    fn classify(&self, score: f64) -> DimensionState {
        if score < self.config.critical_threshold {
            DimensionState::Critical
        } else if score < self.config.warn_threshold {
            DimensionState::Degrading
        } else {
            DimensionState::Stable
        }
    }

    fn reclassify(&mut self) -> Vec<StateTransition> {
        let mut transitions = Vec::new();
        for dimension in 0..self.scores.len() {
            let next = self.classify(self.scores[dimension]);
            let prev = self.states[dimension];
            if next != prev {
                debug!(dimension, from = %prev, to = %next, "Dimension state changed");
                self.states[dimension] = next;
                transitions.push(StateTransition {
                    dimension,
                    from: prev,
                    to: next,
                });
            }
        }
        transitions
    }
}
