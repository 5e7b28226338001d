#![deny(unsafe_code)]
//! # keel-patterns
//!
//! Quantized state signatures, a bounded registry of reference patterns and
//! a similarity matcher whose matches reinforce pattern weights.

pub mod matcher;
pub mod registry;
pub mod signature;

pub use matcher::{MatchResult, PatternMatcher};
pub use registry::{PatternRegistry, RegisteredPattern};
pub use signature::Signature;
