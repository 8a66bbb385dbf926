//! Stochastic vote — %K/%D crossings out of the extreme zones.
//!
//! Bullish when %K crosses above %D coming out of the oversold zone;
//! bearish when %K crosses below %D out of the overbought zone. Strength
//! scales with how deep in the zone the crossing started.

use crate::domain::SeriesSet;
use crate::indicators::stochastic;
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct StochasticVote {
    k_period: usize,
    d_period: usize,
    oversold: f64,
    overbought: f64,
}

impl StochasticVote {
    pub fn new(k_period: usize, d_period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "periods must be >= 1");
        assert!(
            oversold < overbought,
            "oversold level must be below overbought level"
        );
        Self {
            k_period,
            d_period,
            oversold,
            overbought,
        }
    }

    pub fn default_params() -> Self {
        Self::new(14, 3, 20.0, 80.0)
    }
}

impl VoteSource for StochasticVote {
    fn name(&self) -> &'static str {
        "stochastic"
    }

    fn min_bars(&self) -> usize {
        self.k_period + self.d_period
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();

        let s = stochastic(bars, self.k_period, self.d_period);
        let k_cur = s.k[n - 1];
        let k_prev = s.k[n - 2];
        let d_cur = s.d[n - 1];
        let d_prev = s.d[n - 2];

        if k_cur.is_nan() || k_prev.is_nan() || d_cur.is_nan() || d_prev.is_nan() {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let crossed_up = k_cur > d_cur && k_prev <= d_prev;
        let crossed_down = k_cur < d_cur && k_prev >= d_prev;

        if crossed_up && k_prev < self.oversold {
            let depth = (self.oversold - k_prev.min(k_cur)) / self.oversold;
            Ok(IndicatorVote::bullish(self.name(), depth))
        } else if crossed_down && k_prev > self.overbought {
            let depth = (k_prev.max(k_cur) - self.overbought) / (100.0 - self.overbought);
            Ok(IndicatorVote::bearish(self.name(), depth))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
