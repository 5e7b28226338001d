use std::collections::BTreeSet;

use keel_types::Sample;
use serde::{Deserialize, Serialize};

/// Fixed-length byte fingerprint of a system state.
///
/// Derived from a sample by clamping each value to `[0, 1]`, quantizing it
/// into `levels` buckets and spreading the buckets over `0..=255`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Deterministic signature of a sample. `levels` below 2 is treated as 2.
    pub fn from_sample(sample: &Sample, levels: u8) -> Self {
        let top = f64::from(levels.max(2) - 1);
        let bytes = sample
            .clamped()
            .map(|value| {
                let bucket = (value * (top + 1.0)).floor().min(top);
                (bucket * 255.0 / top).round() as u8
            })
            .collect();
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct quantized levels present.
    pub fn complexity(&self) -> usize {
        self.0.iter().collect::<BTreeSet<_>>().len()
    }

    /// Euclidean distance between two signatures of equal length.
    pub fn distance(&self, other: &Signature) -> f64 {
        self.0
            .iter()
            .zip(&other.0)
            .map(|(a, b)| {
                let d = f64::from(*a) - f64::from(*b);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    /// `1 - distance / (255 * sqrt(len))`, in `[0, 1]`. Empty signatures are
    /// identical by definition.
    pub fn similarity(&self, other: &Signature) -> f64 {
        if self.0.is_empty() {
            return 1.0;
        }
        let max_distance = 255.0 * (self.0.len() as f64).sqrt();
        (1.0 - self.distance(other) / max_distance).clamp(0.0, 1.0)
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
