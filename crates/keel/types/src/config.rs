//! Engine configuration.
//!
//! Every knob has a documented default. Components validate their own slice
//! at construction; [`EngineConfig::validate`] checks the whole tree up front.

use serde::{Deserialize, Serialize};

use crate::error::{KeelError, KeelResult};

/// Golden-ratio conjugate (1/φ).
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// Default intervention threshold, `1 - 1/φ`. A tunable constant.
pub const DEFAULT_INTERVENTION_THRESHOLD: f64 = 1.0 - GOLDEN_RATIO_CONJUGATE;

/// Top-level configuration for one detection engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of monitored dimensions (sample length).
    pub dimension_count: usize,

    /// Per-dimension history capacity (ring buffer size).
    pub history_capacity: usize,

    /// Cadence of the detection loop.
    pub check_interval_ms: u32,

    /// Bound of the ingestion queue in front of the detection loop.
    pub queue_capacity: usize,

    /// Stability tracking.
    pub stability: StabilityConfig,

    /// Pairwise correlation.
    pub correlation: CorrelationConfig,

    /// Trend-based prediction.
    pub forecast: ForecastConfig,

    /// Intervention control.
    pub cascade: CascadeConfig,

    /// Pattern registry and matcher.
    pub patterns: PatternConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension_count: 4,
            history_capacity: 32,
            check_interval_ms: 1000,
            queue_capacity: 64,
            stability: StabilityConfig::default(),
            correlation: CorrelationConfig::default(),
            forecast: ForecastConfig::default(),
            cascade: CascadeConfig::default(),
            patterns: PatternConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default configuration for a given number of dimensions.
    pub fn with_dimensions(dimension_count: usize) -> Self {
        Self {
            dimension_count,
            ..Self::default()
        }
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(document: &str) -> KeelResult<Self> {
        let config: Self = serde_yaml::from_str(document)
            .map_err(|e| KeelError::InvalidConfiguration(format!("yaml: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> KeelResult<()> {
        if self.dimension_count == 0 {
            return Err(invalid("dimension_count must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history_capacity must be at least 1"));
        }
        if self.check_interval_ms == 0 {
            return Err(invalid("check_interval_ms must be at least 1"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("queue_capacity must be at least 1"));
        }
        self.stability.validate(self.dimension_count)?;
        self.correlation.validate()?;
        self.forecast.validate()?;
        self.cascade.validate()?;
        self.patterns.validate()?;
        Ok(())
    }
}

/// Stability tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Below this score a dimension is `Degrading`.
    pub warn_threshold: f64,

    /// Below this score a dimension is `Critical`.
    pub critical_threshold: f64,

    /// Aggregate floor; a cycle below it is rejected. Zero disables the
    /// floor. Otherwise it must exceed `retain_weight * critical_threshold`,
    /// the lowest aggregate an update can produce before recalibration.
    pub min_operational_stability: f64,

    /// Weight retained from the previous score when blending.
    pub retain_weight: f64,

    /// Safe baseline restored by recalibration.
    pub baseline: f64,

    /// Multiplicative decay applied on a cycle without a sample.
    pub idle_decay: f64,

    /// Per-dimension weights for the aggregate. Empty means uniform.
    pub weights: Vec<f64>,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            warn_threshold: 0.6,
            critical_threshold: 0.4,
            min_operational_stability: 0.4,
            retain_weight: 0.9,
            baseline: 1.0,
            idle_decay: 0.995,
            weights: Vec::new(),
        }
    }
}

impl StabilityConfig {
    /// A dimension below `critical_threshold` is recalibrated before the next
    /// blend, so a single update lands at or above this value.
    pub fn lowest_reachable_aggregate(&self) -> f64 {
        self.retain_weight * self.critical_threshold
    }

    pub fn validate(&self, dimension_count: usize) -> KeelResult<()> {
        unit("warn_threshold", self.warn_threshold)?;
        unit("critical_threshold", self.critical_threshold)?;
        unit("min_operational_stability", self.min_operational_stability)?;
        unit("retain_weight", self.retain_weight)?;
        unit("baseline", self.baseline)?;
        unit("idle_decay", self.idle_decay)?;
        if self.critical_threshold >= self.warn_threshold {
            return Err(invalid(format!(
                "critical_threshold {} must be below warn_threshold {}",
                self.critical_threshold, self.warn_threshold
            )));
        }
        let lowest = self.lowest_reachable_aggregate();
        if self.min_operational_stability > 0.0 && self.min_operational_stability <= lowest {
            return Err(invalid(format!(
                "min_operational_stability {} is unreachable: updates never drop the aggregate \
                 below retain_weight * critical_threshold = {}",
                self.min_operational_stability, lowest
            )));
        }
        if !self.weights.is_empty() {
            if self.weights.len() != dimension_count {
                return Err(invalid(format!(
                    "weights has {} entries, expected {}",
                    self.weights.len(),
                    dimension_count
                )));
            }
            if self.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(invalid("weights must be finite and non-negative"));
            }
            if self.weights.iter().sum::<f64>() <= 0.0 {
                return Err(invalid("weights must not all be zero"));
            }
        }
        Ok(())
    }
}

/// Correlation matrix configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Maximum number of simultaneous pairs.
    pub max_pairs: usize,

    /// Strength multiplier applied by every measurement.
    pub decay_factor: f64,

    /// Blend weight used when observing co-movement.
    pub observe_weight: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            max_pairs: 32,
            decay_factor: 0.99,
            observe_weight: 0.1,
        }
    }
}

impl CorrelationConfig {
    pub fn validate(&self) -> KeelResult<()> {
        if self.max_pairs == 0 {
            return Err(invalid("max_pairs must be at least 1"));
        }
        unit("decay_factor", self.decay_factor)?;
        unit("observe_weight", self.observe_weight)?;
        Ok(())
    }
}

/// Predictive risk estimator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of most recent history records considered per dimension.
    pub lookback: usize,

    /// Guard term in the time-to-event denominator.
    pub epsilon: f64,

    /// Events are emitted only when probability exceeds this value.
    pub emit_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback: 8,
            epsilon: 1e-4,
            emit_threshold: 0.5,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> KeelResult<()> {
        if self.lookback == 0 {
            return Err(invalid("lookback must be at least 1"));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(invalid("epsilon must be positive"));
        }
        unit("emit_threshold", self.emit_threshold)?;
        Ok(())
    }
}

/// Cascade controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Events at or below this probability are counted but not acted upon.
    pub intervention_threshold: f64,

    /// Base gain before enhancement.
    pub base_gain: f64,

    /// Enhancement factor applied to `1 - probability`.
    pub enhancement: f64,

    /// Upper clamp for every barrier gain.
    pub max_gain: f64,

    /// Fraction of an applied gain propagated to every other dimension.
    pub cross_coupling: f64,

    /// Per-cycle multiplier relaxing barriers back toward zero.
    pub relaxation: f64,

    /// Bound of the intervention log.
    pub log_capacity: usize,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            intervention_threshold: DEFAULT_INTERVENTION_THRESHOLD,
            base_gain: 0.1,
            enhancement: GOLDEN_RATIO_CONJUGATE,
            max_gain: 1.0,
            cross_coupling: 0.1,
            relaxation: 0.98,
            log_capacity: 256,
        }
    }
}

impl CascadeConfig {
    pub fn validate(&self) -> KeelResult<()> {
        unit("intervention_threshold", self.intervention_threshold)?;
        unit("cross_coupling", self.cross_coupling)?;
        unit("relaxation", self.relaxation)?;
        non_negative("base_gain", self.base_gain)?;
        non_negative("enhancement", self.enhancement)?;
        non_negative("max_gain", self.max_gain)?;
        if self.log_capacity == 0 {
            return Err(invalid("log_capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Pattern registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Registry capacity.
    pub max_patterns: usize,

    /// Minimum weighted similarity for a match.
    pub min_confidence: f64,

    /// Weight assigned on registration.
    pub initial_weight: f64,

    /// Quantization levels per signature byte.
    pub signature_levels: u8,

    /// Register signatures that matched nothing.
    pub learn_unmatched: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            max_patterns: 128,
            min_confidence: 0.8,
            initial_weight: 0.9,
            signature_levels: 16,
            learn_unmatched: true,
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> KeelResult<()> {
        if self.max_patterns == 0 {
            return Err(invalid("max_patterns must be at least 1"));
        }
        unit("min_confidence", self.min_confidence)?;
        unit("initial_weight", self.initial_weight)?;
        if self.signature_levels < 2 {
            return Err(invalid("signature_levels must be at least 2"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> KeelError {
    KeelError::InvalidConfiguration(msg.into())
}

fn unit(name: &str, value: f64) -> KeelResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be within [0, 1], got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> KeelResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be finite and non-negative, got {value}")))
    }
}
