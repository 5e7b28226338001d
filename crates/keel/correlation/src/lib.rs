#![deny(unsafe_code)]
//! # keel-correlation
//!
//! Pairwise correlation between monitored dimensions. Pairs are weak
//! references by dimension index; strength lives in `[0, 1]`, is symmetric,
//! and decays once per measurement (never per wall-clock tick).

pub mod matrix;

pub use matrix::{CorrelationEntry, CorrelationMatrix};
