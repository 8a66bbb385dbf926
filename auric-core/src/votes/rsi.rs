//! RSI vote — oversold/overbought mean reversion.
//!
//! Below the oversold level the reversal bias is up (bullish); above the
//! overbought level it is down (bearish). Strength scales with the
//! distance from the 50 midline.

use crate::domain::SeriesSet;
use crate::indicators::rsi;
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct RsiVote {
    period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiVote {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        assert!(
            oversold < overbought,
            "oversold level must be below overbought level"
        );
        Self {
            period,
            oversold,
            overbought,
        }
    }

    pub fn default_params() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl VoteSource for RsiVote {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;

        let value = *rsi(bars, self.period).last().unwrap_or(&f64::NAN);
        if value.is_nan() {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let strength = (value - 50.0).abs() / 50.0;
        if value < self.oversold {
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if value > self.overbought {
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
