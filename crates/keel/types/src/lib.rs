#![deny(unsafe_code)]
//! # keel-types
//!
//! Shared vocabulary of the Keel stability engine: samples, history records,
//! predicted events, intervention records, detection results, configuration
//! and the error taxonomy.

pub mod config;
pub mod detection;
pub mod error;
pub mod events;
pub mod ids;
pub mod sample;

pub use config::{
    CascadeConfig, CorrelationConfig, EngineConfig, ForecastConfig, PatternConfig,
    StabilityConfig, DEFAULT_INTERVENTION_THRESHOLD, GOLDEN_RATIO_CONJUGATE,
};
pub use detection::{DetectionResult, RiskLevel};
pub use error::{KeelError, KeelResult};
pub use events::{HistoryRecord, InterventionRecord, PredictedEvent};
pub use ids::{PairId, PatternId};
pub use sample::Sample;
