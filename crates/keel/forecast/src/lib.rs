#![deny(unsafe_code)]
//! # keel-forecast
//!
//! Predicts impending per-dimension stability failures from score history.
//! Output order is deterministic: severity descending, then dimension
//! ascending.

pub mod estimator;

pub use estimator::{PredictiveRiskEstimator, TrendEstimate};
