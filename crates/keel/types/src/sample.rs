use serde::{Deserialize, Serialize};

use crate::error::{KeelError, KeelResult};

/// One observation of every monitored dimension, produced by an external collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample(Vec<f64>);

impl Sample {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check length and finiteness against the configured dimension count.
    pub fn validate(&self, dimension_count: usize) -> KeelResult<()> {
        if self.0.len() != dimension_count {
            return Err(KeelError::DimensionMismatch {
                expected: dimension_count,
                actual: self.0.len(),
            });
        }
        if let Some((i, v)) = self.0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(KeelError::InvalidSample(format!(
                "dimension {i} is not finite ({v})"
            )));
        }
        Ok(())
    }

    /// Values clamped to the unit interval.
    pub fn clamped(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|v| v.clamp(0.0, 1.0))
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Sample {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}
