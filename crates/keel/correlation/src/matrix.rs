//! Symmetric pairwise correlation store.
//!
//! Pairs are keyed by the ordered dimension tuple `(min, max)`, so a lookup
//! in either direction lands on the same entry and strength is symmetric by
//! construction. Every `measure` is slightly destructive: it reads the
//! strength, then decays it once.

use std::collections::{BTreeMap, HashMap};

use keel_types::{CorrelationConfig, KeelError, KeelResult, PairId, Sample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One active relation between two dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub id: PairId,
    /// Lower dimension index.
    pub dim_a: usize,
    /// Higher dimension index.
    pub dim_b: usize,
    /// Strength in [0.0, 1.0].
    pub strength: f64,
    /// Number of measurements taken so far.
    pub measurements: u64,
}

/// Symmetric correlation matrix over `dimension_count` dimensions.
#[derive(Debug)]
pub struct CorrelationMatrix {
    config: CorrelationConfig,
    dimension_count: usize,
    entries: BTreeMap<PairId, CorrelationEntry>,
    index: HashMap<(usize, usize), PairId>,
    next_id: u64,
}

impl CorrelationMatrix {
    pub fn new(config: CorrelationConfig, dimension_count: usize) -> KeelResult<Self> {
        config.validate()?;
        if dimension_count == 0 {
            return Err(KeelError::InvalidConfiguration(
                "correlation matrix needs at least one dimension".into(),
            ));
        }
        Ok(Self {
            config,
            dimension_count,
            entries: BTreeMap::new(),
            index: HashMap::new(),
            next_id: 1,
        })
    }

    /// Relate two dimensions with strength 1.0.
    ///
    /// Re-pairing an existing relation (in either order) returns its id and
    /// restores full strength without consuming capacity.
    pub fn pair(&mut self, a: usize, b: usize) -> KeelResult<PairId> {
        let key = self.key(a, b)?;

        if let Some(id) = self.index.get(&key).copied() {
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.strength = 1.0;
            }
            debug!(pair = %id, a, b, "Correlation pair refreshed");
            return Ok(id);
        }

        if self.entries.len() >= self.config.max_pairs {
            return Err(KeelError::CapacityExceeded {
                limit: self.config.max_pairs,
            });
        }

        let id = PairId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            CorrelationEntry {
                id,
                dim_a: key.0,
                dim_b: key.1,
                strength: 1.0,
                measurements: 0,
            },
        );
        self.index.insert(key, id);
        debug!(pair = %id, a, b, active = self.entries.len(), "Correlation pair created");
        Ok(id)
    }

    /// Return the current strength, then apply one decay step.
    pub fn measure(&mut self, id: PairId) -> KeelResult<f64> {
        let decay = self.config.decay_factor;
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or_else(|| KeelError::NotFound(id.to_string()))?;
        let current = entry.strength;
        entry.strength = (entry.strength * decay).clamp(0.0, 1.0);
        entry.measurements += 1;
        Ok(current)
    }

    /// Remove the relation. Its strength reads as absent afterwards, and a
    /// later `pair` of the same dimensions starts over at full strength.
    pub fn unpair(&mut self, id: PairId) -> KeelResult<()> {
        let entry = self
            .entries
            .remove(&id)
            .ok_or_else(|| KeelError::NotFound(id.to_string()))?;
        self.index.remove(&(entry.dim_a, entry.dim_b));
        debug!(pair = %id, "Correlation pair removed");
        Ok(())
    }

    /// Blend every active pair toward the co-movement observed between two
    /// consecutive samples. Read-mostly: no measurement decay is applied.
    pub fn observe(&mut self, previous: &Sample, current: &Sample) -> KeelResult<()> {
        previous.validate(self.dimension_count)?;
        current.validate(self.dimension_count)?;

        let prev: Vec<f64> = previous.clamped().collect();
        let curr: Vec<f64> = current.clamped().collect();
        let w = self.config.observe_weight;

        for entry in self.entries.values_mut() {
            let delta_a = curr[entry.dim_a] - prev[entry.dim_a];
            let delta_b = curr[entry.dim_b] - prev[entry.dim_b];
            let agreement = (1.0 - (delta_a - delta_b).abs()).clamp(0.0, 1.0);
            entry.strength = ((1.0 - w) * entry.strength + w * agreement).clamp(0.0, 1.0);
        }
        Ok(())
    }

    /// Non-destructive symmetric lookup by dimension indices.
    pub fn strength_between(&self, a: usize, b: usize) -> Option<f64> {
        let key = (a.min(b), a.max(b));
        self.index
            .get(&key)
            .and_then(|id| self.entries.get(id))
            .map(|e| e.strength)
    }

    /// Id of the relation between two dimensions, if paired.
    pub fn pair_for(&self, a: usize, b: usize) -> Option<PairId> {
        self.index.get(&(a.min(b), a.max(b))).copied()
    }

    pub fn get(&self, id: PairId) -> Option<&CorrelationEntry> {
        self.entries.get(&id)
    }

    /// Active entries ordered by id.
    pub fn entries(&self) -> impl Iterator<Item = &CorrelationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_pairs(&self) -> usize {
        self.config.max_pairs
    }

    fn key(&self, a: usize, b: usize) -> KeelResult<(usize, usize)> {
        if a == b || a >= self.dimension_count || b >= self.dimension_count {
            return Err(KeelError::InvalidPair { a, b });
        }
        Ok((a.min(b), a.max(b)))
    }
}
