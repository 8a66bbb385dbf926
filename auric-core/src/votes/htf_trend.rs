//! Higher-timeframe trend vote — candle colors on the hourly series.
//!
//! Counts green versus red candles over the last few completed H1 bars.
//! A majority of one color votes in that direction with strength equal to
//! the margin; an even split is neutral.

use crate::domain::{SeriesSet, Timeframe};
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct HtfTrendVote {
    candles: usize,
}

impl HtfTrendVote {
    pub fn new(candles: usize) -> Self {
        assert!(candles >= 1, "candle count must be >= 1");
        Self { candles }
    }

    pub fn default_params() -> Self {
        Self::new(4)
    }
}

impl VoteSource for HtfTrendVote {
    fn name(&self) -> &'static str {
        "htf_trend"
    }

    fn timeframe(&self) -> Timeframe {
        Timeframe::H1
    }

    fn min_bars(&self) -> usize {
        self.candles
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let recent = &bars[bars.len() - self.candles..];

        let greens = recent.iter().filter(|b| b.is_bullish()).count();
        let reds = recent.iter().filter(|b| b.is_bearish()).count();

        if greens > reds {
            let strength = (greens - reds) as f64 / self.candles as f64;
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if reds > greens {
            let strength = (reds - greens) as f64 / self.candles as f64;
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
