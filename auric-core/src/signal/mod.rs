//! Signal types: directional votes, the composite classification, and the
//! aggregation/pattern submodules.

pub mod aggregate;
pub mod patterns;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::SnapshotSource;
use crate::sizers::{PositionSizeRecommendation, SizingError};

pub use aggregate::{aggregate, Verdict};
pub use patterns::{PatternDetector, PatternKind, PatternMatch};

/// Directional opinion of a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// Sign applied to the weighted score contribution.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Bullish => 1.0,
            Direction::Bearish => -1.0,
            Direction::Neutral => 0.0,
        }
    }
}

/// One indicator's vote: direction plus a strength in [0, 1].
///
/// Produced fresh on every aggregation pass, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorVote {
    pub indicator: String,
    pub direction: Direction,
    pub strength: f64,
}

impl IndicatorVote {
    pub fn bullish(indicator: &str, strength: f64) -> Self {
        Self::new(indicator, Direction::Bullish, strength)
    }

    pub fn bearish(indicator: &str, strength: f64) -> Self {
        Self::new(indicator, Direction::Bearish, strength)
    }

    pub fn neutral(indicator: &str) -> Self {
        Self::new(indicator, Direction::Neutral, 0.0)
    }

    fn new(indicator: &str, direction: Direction, strength: f64) -> Self {
        let strength = if strength.is_finite() {
            strength.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            indicator: indicator.to_string(),
            direction,
            strength,
        }
    }
}

/// Composite classification, serialized as the literal strings the
/// serving layer passes through to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Buy => "BUY",
            Classification::Sell => "SELL",
            Classification::Hold => "HOLD",
        }
    }
}

/// The unit cached and served: one aggregated answer per snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeSignal {
    pub symbol: String,
    pub classification: Classification,
    /// Saturating |score|, always within [0, 100].
    pub confidence: f64,
    /// Signed weighted vote sum before saturation.
    pub score: f64,
    pub votes: Vec<IndicatorVote>,
    /// Vote sources skipped for insufficient history.
    pub skipped: Vec<String>,
    pub patterns: Vec<PatternMatch>,
    /// ADX reading on the primary timeframe, when computable.
    pub trend_strength: Option<f64>,
    /// ATR reading on the primary timeframe, when computable.
    pub atr: Option<f64>,
    /// Suggested trade size from account equity and the ATR stop, or the
    /// typed reason none could be derived.
    pub position: Result<PositionSizeRecommendation, SizingError>,
    pub source: SnapshotSource,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_serializes_as_literal_strings() {
        assert_eq!(serde_json::to_string(&Classification::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Classification::Sell).unwrap(), "\"SELL\"");
        assert_eq!(serde_json::to_string(&Classification::Hold).unwrap(), "\"HOLD\"");
    }

    #[test]
    fn vote_strength_is_clamped() {
        assert_eq!(IndicatorVote::bullish("rsi", 1.7).strength, 1.0);
        assert_eq!(IndicatorVote::bearish("rsi", -0.3).strength, 0.0);
        assert_eq!(IndicatorVote::bullish("rsi", f64::NAN).strength, 0.0);
    }

    #[test]
    fn neutral_vote_has_zero_strength() {
        let vote = IndicatorVote::neutral("macd");
        assert_eq!(vote.direction, Direction::Neutral);
        assert_eq!(vote.strength, 0.0);
        assert_eq!(vote.direction.sign(), 0.0);
    }
}
