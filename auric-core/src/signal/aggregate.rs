//! Weighted vote aggregation.
//!
//! A pure function of the vote set: identical input votes always yield an
//! identical classification and confidence. No state survives between
//! calls.
//!
//! Scoring: each vote contributes `weight * strength * sign` to a running
//! score on a base of 100 (the default weights sum to 100). Missing votes
//! contribute nothing — their weights are not redistributed, so confidence
//! is naturally lower with sparse data. A weak trend (ADX below the
//! ranging threshold) damps the whole score before classification.

use serde::{Deserialize, Serialize};

use crate::config::IndicatorWeights;
use crate::signal::{Classification, Direction, IndicatorVote};

/// Classification thresholds and the ranging-market gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorParams {
    /// Symmetric around zero: score above +threshold is BUY, below
    /// -threshold is SELL.
    pub signal_threshold: f64,
    pub adx_ranging_threshold: f64,
    pub ranging_factor: f64,
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub classification: Classification,
    /// min(100, |score|), saturating, never negative.
    pub confidence: f64,
    pub score: f64,
}

/// Aggregate indicator votes into one composite verdict.
///
/// `trend_strength` is the ADX reading on the primary timeframe; `None`
/// (insufficient history) leaves the score ungated.
pub fn aggregate(
    votes: &[IndicatorVote],
    trend_strength: Option<f64>,
    weights: &IndicatorWeights,
    params: &AggregatorParams,
) -> Verdict {
    if votes.is_empty() {
        return Verdict {
            classification: Classification::Hold,
            confidence: 0.0,
            score: 0.0,
        };
    }

    let mut bullish_sum = 0.0;
    let mut bearish_sum = 0.0;
    for vote in votes {
        let contribution = weights.weight_for(&vote.indicator) * vote.strength;
        match vote.direction {
            Direction::Bullish => bullish_sum += contribution,
            Direction::Bearish => bearish_sum += contribution,
            Direction::Neutral => {}
        }
    }

    let mut score = bullish_sum - bearish_sum;

    // Ranging-market gate: weak trend discounts every directional vote.
    if let Some(adx) = trend_strength {
        if adx.is_finite() && adx < params.adx_ranging_threshold {
            score *= params.ranging_factor;
        }
    }

    let confidence = score.abs().min(100.0);

    // Tie-break: an exactly balanced vote set is HOLD regardless of
    // thresholds.
    let classification = if score == 0.0 || bullish_sum == bearish_sum {
        Classification::Hold
    } else if score > params.signal_threshold {
        Classification::Buy
    } else if score < -params.signal_threshold {
        Classification::Sell
    } else {
        Classification::Hold
    };

    Verdict {
        classification,
        confidence,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AggregatorParams {
        AggregatorParams {
            signal_threshold: 10.0,
            adx_ranging_threshold: 20.0,
            ranging_factor: 0.7,
        }
    }

    fn weights() -> IndicatorWeights {
        IndicatorWeights::default()
    }

    #[test]
    fn no_votes_is_hold_with_zero_confidence() {
        let verdict = aggregate(&[], Some(35.0), &weights(), &params());
        assert_eq!(verdict.classification, Classification::Hold);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn strong_bullish_votes_classify_buy() {
        let votes = vec![
            IndicatorVote::bullish("ma_cross", 1.0),
            IndicatorVote::bullish("macd", 0.8),
            IndicatorVote::bullish("rsi", 0.6),
        ];
        let verdict = aggregate(&votes, Some(30.0), &weights(), &params());
        assert_eq!(verdict.classification, Classification::Buy);
        // 20*1.0 + 20*0.8 + 13*0.6 = 43.8
        assert!((verdict.score - 43.8).abs() < 1e-9);
        assert!((verdict.confidence - 43.8).abs() < 1e-9);
    }

    #[test]
    fn strong_bearish_votes_classify_sell() {
        let votes = vec![
            IndicatorVote::bearish("ma_cross", 1.0),
            IndicatorVote::bearish("stochastic", 0.9),
        ];
        let verdict = aggregate(&votes, Some(30.0), &weights(), &params());
        assert_eq!(verdict.classification, Classification::Sell);
        assert!(verdict.score < 0.0);
        assert!(verdict.confidence > 0.0);
    }

    #[test]
    fn classification_is_symmetric() {
        let bullish = vec![IndicatorVote::bullish("ma_cross", 0.9)];
        let bearish = vec![IndicatorVote::bearish("ma_cross", 0.9)];
        let up = aggregate(&bullish, Some(30.0), &weights(), &params());
        let down = aggregate(&bearish, Some(30.0), &weights(), &params());
        assert_eq!(up.score, -down.score);
        assert_eq!(up.confidence, down.confidence);
        assert_eq!(up.classification, Classification::Buy);
        assert_eq!(down.classification, Classification::Sell);
    }

    #[test]
    fn balanced_votes_tie_break_to_hold() {
        let votes = vec![
            IndicatorVote::bullish("ma_cross", 1.0),
            IndicatorVote::bearish("macd", 1.0), // same weight, same strength
        ];
        let verdict = aggregate(&votes, Some(30.0), &weights(), &params());
        assert_eq!(verdict.classification, Classification::Hold);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn neutral_votes_contribute_nothing() {
        let votes = vec![
            IndicatorVote::neutral("ma_cross"),
            IndicatorVote::neutral("macd"),
        ];
        let verdict = aggregate(&votes, Some(30.0), &weights(), &params());
        assert_eq!(verdict.classification, Classification::Hold);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn ranging_market_damps_score() {
        let votes = vec![IndicatorVote::bullish("ma_cross", 1.0)];
        let trending = aggregate(&votes, Some(30.0), &weights(), &params());
        let ranging = aggregate(&votes, Some(12.0), &weights(), &params());
        assert!((trending.score - 20.0).abs() < 1e-9);
        assert!((ranging.score - 14.0).abs() < 1e-9);
    }

    #[test]
    fn ranging_gate_can_flip_buy_to_hold() {
        // Score 13 passes the threshold; damped to 9.1 it no longer does.
        let votes = vec![IndicatorVote::bullish("rsi", 1.0)];
        let trending = aggregate(&votes, Some(30.0), &weights(), &params());
        let ranging = aggregate(&votes, Some(12.0), &weights(), &params());
        assert_eq!(trending.classification, Classification::Buy);
        assert_eq!(ranging.classification, Classification::Hold);
    }

    #[test]
    fn missing_adx_leaves_score_ungated() {
        let votes = vec![IndicatorVote::bullish("ma_cross", 1.0)];
        let verdict = aggregate(&votes, None, &weights(), &params());
        assert!((verdict.score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_saturates_at_100() {
        let votes = vec![
            IndicatorVote::bullish("ma_cross", 1.0),
            IndicatorVote::bullish("macd", 1.0),
            IndicatorVote::bullish("rsi", 1.0),
            IndicatorVote::bullish("stochastic", 1.0),
            IndicatorVote::bullish("bollinger", 1.0),
            IndicatorVote::bullish("support_resistance", 1.0),
            IndicatorVote::bullish("htf_trend", 1.0),
            IndicatorVote::bullish("volume", 1.0),
        ];
        let mut weights = IndicatorWeights::default();
        weights.ma_cross = 60.0; // push the raw score past 100
        let verdict = aggregate(&votes, Some(40.0), &weights, &params());
        assert_eq!(verdict.confidence, 100.0);
        assert!(verdict.score > 100.0);
    }

    #[test]
    fn aggregation_is_pure() {
        let votes = vec![
            IndicatorVote::bullish("ma_cross", 0.7),
            IndicatorVote::bearish("bollinger", 0.4),
        ];
        let first = aggregate(&votes, Some(25.0), &weights(), &params());
        let second = aggregate(&votes, Some(25.0), &weights(), &params());
        assert_eq!(first, second);
    }
}
