//! Error types shared by every Keel component.

use thiserror::Error;

/// Errors raised by the Keel detection core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeelError {
    /// A configuration value is out of range. Raised at construction only.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The correlation matrix already holds its maximum number of pairs.
    #[error("capacity exceeded: limit of {limit} reached")]
    CapacityExceeded { limit: usize },

    /// Lookup of an unknown identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// Aggregate stability fell below the operational floor for this cycle.
    #[error("insufficient stability: aggregate {aggregate:.4} below floor {floor:.4}")]
    InsufficientStability { aggregate: f64, floor: f64 },

    /// Sample length does not match the configured dimension count.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Sample carries a non-finite value.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// A pair must join two distinct, in-range dimensions.
    #[error("invalid pair ({a}, {b})")]
    InvalidPair { a: usize, b: usize },

    /// Signature length does not match the registry's signature length.
    #[error("invalid signature: expected length {expected}, got {actual}")]
    InvalidSignature { expected: usize, actual: usize },

    /// A dimension index outside the monitored range.
    #[error("dimension {dimension} out of range (count {count})")]
    DimensionOutOfRange { dimension: usize, count: usize },
}

impl KeelError {
    /// Whether the caller can recover (retry, unpair, back off) without a restart.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KeelError::CapacityExceeded { .. }
                | KeelError::NotFound(_)
                | KeelError::InsufficientStability { .. }
        )
    }
}

/// Result type for Keel operations.
pub type KeelResult<T> = Result<T, KeelError>;
