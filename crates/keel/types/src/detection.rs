use serde::{Deserialize, Serialize};

use crate::ids::PatternId;

/// Risk classification of one detection cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Fixed confidence bands.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.95 {
            Self::Critical
        } else if confidence >= 0.80 {
            Self::High
        } else if confidence >= 0.60 {
            Self::Medium
        } else if confidence >= 0.40 {
            Self::Low
        } else {
            Self::None
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Output of one detection cycle. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    confidence: f64,
    matched_pattern_id: Option<u64>,
    risk_level: RiskLevel,
    timestamp: i64,
}

impl DetectionResult {
    /// Build a result; the risk level is derived from the clamped confidence.
    pub fn new(confidence: f64, matched_pattern_id: Option<PatternId>, timestamp: i64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            confidence,
            matched_pattern_id: matched_pattern_id.map(|id| id.0),
            risk_level: RiskLevel::from_confidence(confidence),
            timestamp,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn matched_pattern_id(&self) -> Option<u64> {
        self.matched_pattern_id
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Millis since epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
