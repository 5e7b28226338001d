use keel_types::{KeelResult, PatternConfig, PatternId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::PatternRegistry;
use crate::signature::Signature;

/// Best registered pattern for a signature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub pattern_id: PatternId,
    /// Raw similarity in [0.0, 1.0].
    pub similarity: f64,
    /// Similarity scaled by the pattern's weight before the match.
    pub confidence: f64,
}

/// Finds the best registered pattern above a confidence floor.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    min_confidence: f64,
}

impl PatternMatcher {
    pub fn new(config: &PatternConfig) -> KeelResult<Self> {
        config.validate()?;
        Ok(Self {
            min_confidence: config.min_confidence,
        })
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Best match by confidence (ties: lower id), only if strictly above
    /// `min_confidence`. A match updates the pattern's weight, match count
    /// and last-seen clock. No match is `Ok(None)`.
    pub fn find_match(
        &self,
        registry: &mut PatternRegistry,
        signature: &Signature,
    ) -> KeelResult<Option<MatchResult>> {
        registry.check_len(signature)?;

        let mut best: Option<MatchResult> = None;
        for pattern in registry.iter() {
            let similarity = pattern.signature.similarity(signature);
            let confidence = similarity * pattern.weight;
            // Iteration is in id order, so strict `>` keeps the lower id on ties.
            if best.map_or(true, |b| confidence > b.confidence) {
                best = Some(MatchResult {
                    pattern_id: pattern.id,
                    similarity,
                    confidence,
                });
            }
        }

        let Some(found) = best.filter(|b| b.confidence > self.min_confidence) else {
            debug!(candidates = registry.len(), "No pattern match");
            return Ok(None);
        };

        let weight = registry.record_match(found.pattern_id, found.similarity);
        debug!(
            pattern = %found.pattern_id,
            similarity = found.similarity,
            confidence = found.confidence,
            weight,
            "Pattern matched"
        );
        Ok(Some(found))
    }
}
