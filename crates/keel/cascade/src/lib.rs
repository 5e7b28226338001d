#![deny(unsafe_code)]
//! # keel-cascade
//!
//! Consumes predicted events and reinforces per-dimension barrier gains.
//! Gains are bounded to `[0, max_gain]`; every action lands in a bounded
//! intervention log used for success metrics.

pub mod controller;

pub use controller::{CascadeController, InterventionResult, InterventionStats};
