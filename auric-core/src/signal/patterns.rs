//! Candlestick pattern detection on the trailing bars of the primary
//! timeframe.
//!
//! Shape matches use ratio thresholds on body-to-range and wick lengths:
//! - doji: body <= 10% of range
//! - hammer: lower wick >= 2x body, body in the upper third of the range
//! - shooting star: upper wick >= 2x body, body in the lower third
//! - engulfing: current body strictly contains and exceeds the previous
//!   body with opposite color
//!
//! Detection is independent per bar position; multiple patterns may
//! co-match the same bars. All matches above the minimum confidence are
//! reported, ranked by confidence descending.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

const DOJI_BODY_RATIO: f64 = 0.10;
const WICK_BODY_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    EngulfingBullish,
    EngulfingBearish,
    Doji,
    Hammer,
    ShootingStar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: PatternKind,
    /// Index of the matched bar within the scanned series.
    pub bar_index: usize,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct PatternDetector {
    window: usize,
    min_confidence: f64,
}

impl PatternDetector {
    pub fn new(window: usize, min_confidence: f64) -> Self {
        assert!(window >= 1, "pattern window must be >= 1");
        Self {
            window,
            min_confidence,
        }
    }

    /// Scan the trailing `window` bars and report ranked matches.
    pub fn detect(&self, bars: &[Bar]) -> Vec<PatternMatch> {
        let n = bars.len();
        let start = n.saturating_sub(self.window);
        let mut matches = Vec::new();

        for i in start..n {
            let bar = &bars[i];
            if !bar.is_sane() {
                continue;
            }

            if let Some(confidence) = doji_confidence(bar) {
                matches.push(PatternMatch {
                    pattern: PatternKind::Doji,
                    bar_index: i,
                    confidence,
                });
            }
            if let Some(confidence) = hammer_confidence(bar) {
                matches.push(PatternMatch {
                    pattern: PatternKind::Hammer,
                    bar_index: i,
                    confidence,
                });
            }
            if let Some(confidence) = shooting_star_confidence(bar) {
                matches.push(PatternMatch {
                    pattern: PatternKind::ShootingStar,
                    bar_index: i,
                    confidence,
                });
            }
            if i > 0 {
                if let Some((pattern, confidence)) = engulfing(&bars[i - 1], bar) {
                    matches.push(PatternMatch {
                        pattern,
                        bar_index: i,
                        confidence,
                    });
                }
            }
        }

        matches.retain(|m| m.confidence >= self.min_confidence);
        // Rank by confidence descending; ties go to the more recent bar.
        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.bar_index.cmp(&a.bar_index))
        });
        matches
    }
}

/// Doji: body is at most 10% of the range. Confidence grows as the body
/// shrinks toward zero. Zero-range bars match nothing.
fn doji_confidence(bar: &Bar) -> Option<f64> {
    let range = bar.range();
    if range <= 0.0 {
        return None;
    }
    let body_ratio = bar.body() / range;
    if body_ratio > DOJI_BODY_RATIO {
        return None;
    }
    Some((1.0 - body_ratio / DOJI_BODY_RATIO).clamp(0.0, 1.0))
}

/// Hammer: lower wick at least twice the body, body in the upper third.
/// Confidence scales with the wick-to-body ratio beyond the threshold.
fn hammer_confidence(bar: &Bar) -> Option<f64> {
    let range = bar.range();
    let body = bar.body();
    if range <= 0.0 || body <= 0.0 {
        return None;
    }
    let body_low = bar.open.min(bar.close);
    let lower_wick = body_low - bar.low;
    if lower_wick < WICK_BODY_RATIO * body {
        return None;
    }
    if body_low < bar.low + range * (2.0 / 3.0) {
        return None;
    }
    Some((lower_wick / body / (2.0 * WICK_BODY_RATIO)).clamp(0.0, 1.0))
}

/// Shooting star: mirror of the hammer — upper wick at least twice the
/// body, body in the lower third.
fn shooting_star_confidence(bar: &Bar) -> Option<f64> {
    let range = bar.range();
    let body = bar.body();
    if range <= 0.0 || body <= 0.0 {
        return None;
    }
    let body_high = bar.open.max(bar.close);
    let upper_wick = bar.high - body_high;
    if upper_wick < WICK_BODY_RATIO * body {
        return None;
    }
    if body_high > bar.high - range * (2.0 / 3.0) {
        return None;
    }
    Some((upper_wick / body / (2.0 * WICK_BODY_RATIO)).clamp(0.0, 1.0))
}

/// Engulfing: current body strictly contains and exceeds the previous
/// body, with opposite candle colors. Confidence grows with how much of
/// the current body exceeds the previous one.
fn engulfing(prev: &Bar, curr: &Bar) -> Option<(PatternKind, f64)> {
    if !prev.is_sane() {
        return None;
    }
    let prev_body = prev.body();
    let curr_body = curr.body();
    if prev_body <= 0.0 || curr_body <= prev_body {
        return None;
    }

    let prev_low = prev.open.min(prev.close);
    let prev_high = prev.open.max(prev.close);
    let curr_low = curr.open.min(curr.close);
    let curr_high = curr.open.max(curr.close);
    if curr_low > prev_low || curr_high < prev_high {
        return None;
    }

    let kind = if prev.is_bullish() && curr.is_bearish() {
        PatternKind::EngulfingBearish
    } else if prev.is_bearish() && curr.is_bullish() {
        PatternKind::EngulfingBullish
    } else {
        return None;
    };

    let confidence = (1.0 - prev_body / curr_body).clamp(0.0, 1.0);
    Some((kind, confidence))
}
