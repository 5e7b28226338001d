//! Bounded registry of reference patterns.
//!
//! At capacity the registry evicts by ascending weight (ties: least recently
//! seen) down to three quarters of capacity before admitting a new entry, so
//! the newest registration always survives.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use keel_types::{KeelError, KeelResult, PatternConfig, PatternId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::signature::Signature;

/// Fraction of capacity kept after an eviction pass.
const EVICTION_RETAIN_FRACTION: f64 = 0.75;

/// Blend retained from the old weight on a match.
const WEIGHT_RETAIN: f64 = 0.9;

/// One entry in the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegisteredPattern {
    pub id: PatternId,
    pub signature: Signature,
    /// Weight in [0.0, 1.0].
    pub weight: f64,
    /// Distinct quantized levels in the signature.
    pub complexity: usize,
    pub match_count: u64,
    /// Registry logical clock value at registration or last match.
    pub last_seen: u64,
}

/// Bounded collection of reference signatures.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    config: PatternConfig,
    signature_len: usize,
    patterns: BTreeMap<PatternId, RegisteredPattern>,
    next_id: u64,
    clock: u64,
    evictions: u64,
}

impl PatternRegistry {
    pub fn new(config: PatternConfig, signature_len: usize) -> KeelResult<Self> {
        config.validate()?;
        if signature_len == 0 {
            return Err(KeelError::InvalidConfiguration(
                "signature length must be at least 1".into(),
            ));
        }
        Ok(Self {
            config,
            signature_len,
            patterns: BTreeMap::new(),
            next_id: 0,
            clock: 0,
            evictions: 0,
        })
    }

    /// Register a signature, evicting low-weight entries first if full.
    pub fn register(&mut self, signature: Signature) -> KeelResult<PatternId> {
        self.check_len(&signature)?;

        if self.patterns.len() >= self.config.max_patterns {
            self.evict();
        }

        let id = PatternId(self.next_id);
        self.next_id += 1;
        let last_seen = self.tick();
        let pattern = RegisteredPattern {
            id,
            complexity: signature.complexity(),
            signature,
            weight: self.config.initial_weight,
            match_count: 0,
            last_seen,
        };
        debug!(
            pattern = %id,
            complexity = pattern.complexity,
            registered = self.patterns.len() + 1,
            "Registered pattern"
        );
        self.patterns.insert(id, pattern);
        Ok(id)
    }

    pub fn get(&self, id: PatternId) -> Option<&RegisteredPattern> {
        self.patterns.get(&id)
    }

    pub fn remove(&mut self, id: PatternId) -> KeelResult<RegisteredPattern> {
        let removed = self
            .patterns
            .remove(&id)
            .ok_or_else(|| KeelError::NotFound(id.to_string()))?;
        debug!(pattern = %id, "Removed pattern");
        Ok(removed)
    }

    /// Registered patterns in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredPattern> {
        self.patterns.values()
    }

    pub fn ids(&self) -> Vec<PatternId> {
        self.patterns.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Total entries evicted over the registry's lifetime.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn signature_len(&self) -> usize {
        self.signature_len
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Fold a match into the pattern's weight. The only weight mutation path.
    pub(crate) fn record_match(&mut self, id: PatternId, similarity: f64) -> Option<f64> {
        let seen = self.tick();
        let pattern = self.patterns.get_mut(&id)?;
        pattern.weight =
            (WEIGHT_RETAIN * pattern.weight + (1.0 - WEIGHT_RETAIN) * similarity).clamp(0.0, 1.0);
        pattern.match_count += 1;
        pattern.last_seen = seen;
        Some(pattern.weight)
    }

    pub(crate) fn check_len(&self, signature: &Signature) -> KeelResult<()> {
        if signature.len() != self.signature_len {
            return Err(KeelError::InvalidSignature {
                expected: self.signature_len,
                actual: signature.len(),
            });
        }
        Ok(())
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict(&mut self) {
        let max = self.config.max_patterns;
        let target = ((max as f64 * EVICTION_RETAIN_FRACTION).floor() as usize).min(max - 1);

        let mut victims: Vec<(PatternId, f64, u64)> = self
            .patterns
            .values()
            .map(|p| (p.id, p.weight, p.last_seen))
            .collect();
        victims.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });

        let excess = self.patterns.len().saturating_sub(target);
        for (id, _, _) in victims.into_iter().take(excess) {
            self.patterns.remove(&id);
        }
        self.evictions += excess as u64;
        warn!(
            evicted = excess,
            remaining = self.patterns.len(),
            capacity = max,
            "Pattern registry full, evicted lowest-weight patterns"
        );
    }
}
