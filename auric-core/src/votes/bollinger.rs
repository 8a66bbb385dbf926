//! Bollinger band vote — mean reversion at the band edges.
//!
//! Position within the bands: at or below the lower quarter is bullish,
//! at or above the upper quarter is bearish. Strength grows toward the
//! band edge and past it (clamped at 1 outside the bands).

use crate::domain::SeriesSet;
use crate::indicators::bollinger;
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct BollingerVote {
    period: usize,
    multiplier: f64,
    edge_zone: f64,
}

impl BollingerVote {
    pub fn new(period: usize, multiplier: f64, edge_zone: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(
            edge_zone > 0.0 && edge_zone < 0.5,
            "edge zone must be within (0, 0.5)"
        );
        Self {
            period,
            multiplier,
            edge_zone,
        }
    }

    pub fn default_params() -> Self {
        Self::new(20, 2.0, 0.25)
    }
}

impl VoteSource for BollingerVote {
    fn name(&self) -> &'static str {
        "bollinger"
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();

        let bb = bollinger(bars, self.period, self.multiplier);
        let upper = bb.upper[n - 1];
        let lower = bb.lower[n - 1];
        let close = bars[n - 1].close;

        let width = upper - lower;
        if !width.is_finite() || width <= 0.0 || close.is_nan() {
            // Collapsed bands (flat market) carry no reversion signal.
            return Ok(IndicatorVote::neutral(self.name()));
        }

        let position = (close - lower) / width;
        if position <= self.edge_zone {
            let strength = (self.edge_zone - position) / self.edge_zone;
            Ok(IndicatorVote::bullish(self.name(), strength))
        } else if position >= 1.0 - self.edge_zone {
            let strength = (position - (1.0 - self.edge_zone)) / self.edge_zone;
            Ok(IndicatorVote::bearish(self.name(), strength))
        } else {
            Ok(IndicatorVote::neutral(self.name()))
        }
    }
}
