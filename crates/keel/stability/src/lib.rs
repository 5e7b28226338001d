#![deny(unsafe_code)]
//! # keel-stability
//!
//! Per-dimension stability scores with blend, idle decay, state transitions
//! and automatic recalibration.

pub mod tracker;

pub use tracker::{DimensionState, StabilityTracker, StateTransition, UpdateOutcome};
