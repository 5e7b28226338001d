#![deny(unsafe_code)]
//! # keel-tests
//!
//! Shared fixtures for the end-to-end scenarios and property tests.

use keel_history::RingBuffer;
use keel_types::{EngineConfig, HistoryRecord, Sample};

/// A sample with every dimension set to `value`.
pub fn uniform_sample(dimensions: usize, value: f64) -> Sample {
    Sample::new(vec![value; dimensions])
}

/// A history buffer holding `values` in order, one millisecond apart.
pub fn history_of(values: &[f64]) -> RingBuffer<HistoryRecord> {
    let capacity = values.len().max(1);
    let mut history = RingBuffer::new(capacity).expect("non-zero capacity");
    for (i, value) in values.iter().enumerate() {
        history.push(HistoryRecord::new(i as i64, *value));
    }
    history
}

/// Default engine configuration whose scores follow samples immediately.
pub fn responsive_config(dimensions: usize) -> EngineConfig {
    let mut config = EngineConfig::with_dimensions(dimensions);
    config.stability.retain_weight = 0.0;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_consistent() {
        assert_eq!(uniform_sample(3, 0.5).len(), 3);
        let h = history_of(&[0.1, 0.2]);
        assert_eq!(h.len(), 2);
        assert!(responsive_config(2).validate().is_ok());
    }
}
