//! MACD vote — signal-line crossings.
//!
//! Bullish when the MACD line crosses above its signal line on the latest
//! bar, bearish on a cross below, neutral otherwise. Strength is the
//! histogram magnitude in ATR units, clamped to 1.

use crate::domain::SeriesSet;
use crate::indicators::{atr, macd};
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct MacdVote {
    fast: usize,
    slow: usize,
    signal: usize,
    atr_period: usize,
}

impl MacdVote {
    pub fn new(fast: usize, slow: usize, signal: usize, atr_period: usize) -> Self {
        assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        assert!(atr_period >= 1, "ATR period must be >= 1");
        Self {
            fast,
            slow,
            signal,
            atr_period,
        }
    }

    pub fn default_params() -> Self {
        Self::new(12, 26, 9, 14)
    }
}

impl VoteSource for MacdVote {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn min_bars(&self) -> usize {
        self.slow + self.signal
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();

        let m = macd(bars, self.fast, self.slow, self.signal);
        let l_cur = m.line[n - 1];
        let l_prev = m.line[n - 2];
        let s_cur = m.signal[n - 1];
        let s_prev = m.signal[n - 2];
        let hist = m.histogram[n - 1];

        if l_cur.is_nan() || l_prev.is_nan() || s_cur.is_nan() || s_prev.is_nan() {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let atr_cur = *atr(bars, self.atr_period).last().unwrap_or(&f64::NAN);
        let strength = if atr_cur.is_finite() && atr_cur > 0.0 {
            (hist.abs() / atr_cur).min(1.0)
        } else {
            0.0
        };

        if l_cur > s_cur && l_prev <= s_prev {
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if l_cur < s_cur && l_prev >= s_prev {
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
