#![deny(unsafe_code)]
//! # keel-history
//!
//! Fixed-capacity circular history store used for per-dimension score
//! history and the bounded intervention log.

pub mod ring;

pub use ring::{RingBuffer, RingBufferIter};
