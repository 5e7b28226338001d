//! Detection facade.
//!
//! Owns every core component and runs one detection cycle per sample:
//!
//! 1. stability update and correlation observation, then the operational floor
//! 2. signature derivation and pattern matching (unmatched states are learned)
//! 3. barrier relaxation, prediction and intervention
//! 4. confidence and risk classification

use chrono::Utc;
use keel_cascade::{CascadeController, InterventionStats};
use keel_correlation::CorrelationMatrix;
use keel_forecast::PredictiveRiskEstimator;
use keel_patterns::{PatternMatcher, PatternRegistry, Signature};
use keel_stability::{DimensionState, StabilityTracker, StateTransition};
use keel_types::{
    DetectionResult, EngineConfig, KeelError, KeelResult, PairId, PredictedEvent, Sample,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Point-in-time view of the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub engine_id: Uuid,
    pub aggregate: f64,
    pub scores: Vec<f64>,
    pub states: Vec<DimensionState>,
    pub recalibrations: u64,
    pub pattern_count: usize,
    pub pattern_evictions: u64,
    pub active_pairs: usize,
    pub interventions: InterventionStats,
    pub cycles_processed: u64,
    pub cycles_rejected: u64,
}

/// Single entry point: sample in, detection result out.
#[derive(Debug)]
pub struct DetectionFacade {
    id: Uuid,
    config: EngineConfig,
    tracker: StabilityTracker,
    correlation: CorrelationMatrix,
    estimator: PredictiveRiskEstimator,
    controller: CascadeController,
    registry: PatternRegistry,
    matcher: PatternMatcher,
    previous: Option<Sample>,
    last_events: Vec<PredictedEvent>,
    cycles_processed: u64,
    cycles_rejected: u64,
}

impl DetectionFacade {
    pub fn new(config: EngineConfig) -> KeelResult<Self> {
        config.validate()?;
        let dimensions = config.dimension_count;

        let tracker =
            StabilityTracker::new(config.stability.clone(), dimensions, config.history_capacity)?;
        let correlation = CorrelationMatrix::new(config.correlation.clone(), dimensions)?;
        let estimator = PredictiveRiskEstimator::new(config.forecast.clone())?;
        let controller = CascadeController::new(config.cascade.clone(), dimensions)?;
        let registry = PatternRegistry::new(config.patterns.clone(), dimensions)?;
        let matcher = PatternMatcher::new(&config.patterns)?;

        let id = Uuid::new_v4();
        info!(
            engine = %id,
            dimensions,
            history_capacity = config.history_capacity,
            max_patterns = config.patterns.max_patterns,
            "Detection engine created"
        );

        Ok(Self {
            id,
            config,
            tracker,
            correlation,
            estimator,
            controller,
            registry,
            matcher,
            previous: None,
            last_events: Vec::new(),
            cycles_processed: 0,
            cycles_rejected: 0,
        })
    }

    /// Run one cycle stamped with the current wall clock.
    pub fn process(&mut self, sample: &Sample) -> KeelResult<DetectionResult> {
        self.process_at(sample, Utc::now().timestamp_millis())
    }

    /// Run one cycle with an explicit timestamp (millis since epoch).
    pub fn process_at(&mut self, sample: &Sample, timestamp_ms: i64) -> KeelResult<DetectionResult> {
        let result = self.run_cycle(sample, timestamp_ms);
        match &result {
            Ok(_) => self.cycles_processed += 1,
            Err(e) => {
                self.cycles_rejected += 1;
                warn!(engine = %self.id, error = %e, "Detection cycle rejected");
            }
        }
        result
    }

    fn run_cycle(&mut self, sample: &Sample, timestamp_ms: i64) -> KeelResult<DetectionResult> {
        // 1. stability and correlation
        let outcome = self.tracker.update(sample, timestamp_ms)?;
        if let Some(previous) = &self.previous {
            self.correlation.observe(previous, sample)?;
        }
        self.previous = Some(sample.clone());

        let floor = self.config.stability.min_operational_stability;
        if outcome.aggregate < floor {
            self.last_events.clear();
            return Err(KeelError::InsufficientStability {
                aggregate: outcome.aggregate,
                floor,
            });
        }

        // 2. patterns
        let signature = Signature::from_sample(sample, self.config.patterns.signature_levels);
        let matched = self.matcher.find_match(&mut self.registry, &signature)?;
        if matched.is_none() && self.config.patterns.learn_unmatched {
            self.registry.register(signature)?;
        }

        // 3. prediction and intervention
        self.controller.relax();
        let events = self.estimator.evaluate(self.tracker.histories());
        let intervention = self.controller.intervene(&events, timestamp_ms)?;

        // 4. classification
        let peak = events.iter().map(|e| e.probability).fold(0.0, f64::max);
        let confidence = (1.0 - outcome.aggregate).max(peak);
        let result = DetectionResult::new(confidence, matched.map(|m| m.pattern_id), timestamp_ms);

        debug!(
            engine = %self.id,
            aggregate = outcome.aggregate,
            events = events.len(),
            interventions = intervention.successful_interventions,
            matched = ?result.matched_pattern_id(),
            risk = %result.risk_level(),
            confidence = result.confidence(),
            "Detection cycle complete"
        );

        self.last_events = events;
        Ok(result)
    }

    /// A cycle passed without a sample: decay scores and relax barriers.
    pub fn idle_tick(&mut self) -> Vec<StateTransition> {
        self.controller.relax();
        let transitions = self.tracker.tick();
        debug!(
            engine = %self.id,
            aggregate = self.tracker.aggregate(),
            transitions = transitions.len(),
            "Idle tick"
        );
        transitions
    }

    pub fn pair_dimensions(&mut self, a: usize, b: usize) -> KeelResult<PairId> {
        self.correlation.pair(a, b)
    }

    pub fn unpair_dimensions(&mut self, id: PairId) -> KeelResult<()> {
        self.correlation.unpair(id)
    }

    /// Current strength of a pair; the measurement itself decays it.
    pub fn measure_correlation(&mut self, id: PairId) -> KeelResult<f64> {
        self.correlation.measure(id)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            engine_id: self.id,
            aggregate: self.tracker.aggregate(),
            scores: self.tracker.scores().to_vec(),
            states: self.tracker.states().to_vec(),
            recalibrations: self.tracker.recalibrations(),
            pattern_count: self.registry.len(),
            pattern_evictions: self.registry.evictions(),
            active_pairs: self.correlation.len(),
            interventions: self.controller.stats(),
            cycles_processed: self.cycles_processed,
            cycles_rejected: self.cycles_rejected,
        }
    }

    /// Events predicted by the last accepted cycle.
    pub fn last_events(&self) -> &[PredictedEvent] {
        &self.last_events
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tracker(&self) -> &StabilityTracker {
        &self.tracker
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn controller(&self) -> &CascadeController {
        &self.controller
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }
}
