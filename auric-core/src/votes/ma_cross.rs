//! Moving average crossover vote — fast versus slow SMA with slope
//! confirmation.
//!
//! Bullish when the fast average is above the slow average and still
//! rising; bearish when below and falling; neutral otherwise. Strength is
//! the separation between the averages in ATR units, clamped to 1.

use crate::domain::SeriesSet;
use crate::indicators::{atr, sma};
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct MaCrossVote {
    fast: usize,
    slow: usize,
    atr_period: usize,
}

impl MaCrossVote {
    pub fn new(fast: usize, slow: usize, atr_period: usize) -> Self {
        assert!(fast >= 1, "fast period must be >= 1");
        assert!(slow > fast, "slow period must be > fast period");
        assert!(atr_period >= 1, "ATR period must be >= 1");
        Self {
            fast,
            slow,
            atr_period,
        }
    }

    pub fn default_params() -> Self {
        Self::new(10, 50, 14)
    }
}

impl VoteSource for MaCrossVote {
    fn name(&self) -> &'static str {
        "ma_cross"
    }

    fn min_bars(&self) -> usize {
        self.slow + 1
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();

        let fast_ma = sma(bars, self.fast);
        let slow_ma = sma(bars, self.slow);
        let f_cur = fast_ma[n - 1];
        let f_prev = fast_ma[n - 2];
        let s_cur = slow_ma[n - 1];

        if f_cur.is_nan() || f_prev.is_nan() || s_cur.is_nan() {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let atr_cur = *atr(bars, self.atr_period).last().unwrap_or(&f64::NAN);
        let strength = if atr_cur.is_finite() && atr_cur > 0.0 {
            ((f_cur - s_cur).abs() / atr_cur).min(1.0)
        } else {
            0.0
        };

        if f_cur > s_cur && f_cur > f_prev {
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if f_cur < s_cur && f_cur < f_prev {
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;
    use crate::signal::Direction;
    use crate::votes::m5_series;

    #[test]
    fn uptrend_votes_bullish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = m5_series(make_bars(&closes));
        let vote = MaCrossVote::default_params().evaluate(&series).unwrap();
        assert_eq!(vote.direction, Direction::Bullish);
        assert!(vote.strength > 0.0);
    }

    #[test]
    fn downtrend_votes_bearish() {
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let series = m5_series(make_bars(&closes));
        let vote = MaCrossVote::default_params().evaluate(&series).unwrap();
        assert_eq!(vote.direction, Direction::Bearish);
    }

    #[test]
    fn fast_above_but_falling_is_neutral() {
        // Long uptrend that rolls over at the end: fast is still above
        // slow but no longer rising.
        let mut closes: Vec<f64> = (0..55).map(|i| 100.0 + i as f64).collect();
        closes.extend([154.0, 150.0, 148.0, 147.0, 146.0]);
        let series = m5_series(make_bars(&closes));
        let vote = MaCrossVote::default_params().evaluate(&series).unwrap();
        assert_eq!(vote.direction, Direction::Neutral);
    }

    #[test]
    fn insufficient_history_is_skipped() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = m5_series(make_bars(&closes));
        let err = MaCrossVote::default_params().evaluate(&series).unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientHistory { required: 51, .. }
        ));
    }

    #[test]
    #[should_panic(expected = "slow period must be > fast")]
    fn rejects_inverted_periods() {
        MaCrossVote::new(50, 10, 14);
    }
}
