//! Volume vote — confirmation of the prevailing price move.
//!
//! Volume never originates a direction: it only amplifies the direction
//! of the latest close-to-close move, and only when current volume runs
//! meaningfully above its moving average. Flat price or ordinary volume
//! is neutral.

use crate::domain::SeriesSet;
use crate::indicators::sma_of_series;
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct VolumeVote {
    avg_period: usize,
    ratio_threshold: f64,
}

impl VolumeVote {
    pub fn new(avg_period: usize, ratio_threshold: f64) -> Self {
        assert!(avg_period >= 1, "volume average period must be >= 1");
        assert!(ratio_threshold >= 1.0, "ratio threshold must be >= 1");
        Self {
            avg_period,
            ratio_threshold,
        }
    }

    pub fn default_params() -> Self {
        Self::new(20, 1.5)
    }
}

impl VoteSource for VolumeVote {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn min_bars(&self) -> usize {
        self.avg_period + 1
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();

        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let average = *sma_of_series(&volumes, self.avg_period)
            .last()
            .unwrap_or(&f64::NAN);
        if !average.is_finite() || average <= 0.0 {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let ratio = volumes[n - 1] / average;
        if ratio < self.ratio_threshold {
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let move_sign = bars[n - 1].close - bars[n - 2].close;
        let strength = ((ratio - 1.0) / 2.0).min(1.0);
        if move_sign > 0.0 {
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if move_sign < 0.0 {
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            // Elevated volume with no price direction confirms nothing.
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
