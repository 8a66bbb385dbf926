//! Support/resistance vote — proximity to recent swing levels.
//!
//! Swing lows below the current price act as support, swing highs above
//! it as resistance. A vote fires only when price is within half an ATR
//! of the level; strength decays linearly with distance. When both a
//! support and a resistance are in range, the closer one wins; an exact
//! tie is neutral.

use crate::domain::SeriesSet;
use crate::indicators::{atr, swing_highs, swing_lows};
use crate::signal::IndicatorVote;
use crate::votes::{history, IndicatorError, VoteSource};

#[derive(Debug, Clone)]
pub struct SupportResistanceVote {
    swing_window: usize,
    atr_period: usize,
}

impl SupportResistanceVote {
    pub fn new(swing_window: usize, atr_period: usize) -> Self {
        assert!(swing_window >= 1, "swing window must be >= 1");
        assert!(atr_period >= 1, "ATR period must be >= 1");
        Self {
            swing_window,
            atr_period,
        }
    }

    pub fn default_params() -> Self {
        Self::new(2, 14)
    }
}

impl VoteSource for SupportResistanceVote {
    fn name(&self) -> &'static str {
        "support_resistance"
    }

    fn min_bars(&self) -> usize {
        (self.atr_period + 1).max(2 * self.swing_window + 1)
    }

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError> {
        let bars = history(series, self.name(), self.timeframe(), self.min_bars())?;
        let n = bars.len();
        let price = bars[n - 1].close;

        let atr_cur = *atr(bars, self.atr_period).last().unwrap_or(&f64::NAN);
        if !atr_cur.is_finite() || atr_cur <= 0.0 || price.is_nan() {
            return Ok(IndicatorVote::neutral(self.name()));
        }
        let band = 0.5 * atr_cur;

        // Nearest support below and resistance above the current price.
        let support = swing_lows(bars, self.swing_window)
            .into_iter()
            .map(|(_, level)| level)
            .filter(|&level| level < price)
            .fold(f64::NEG_INFINITY, f64::max);
        let resistance = swing_highs(bars, self.swing_window)
            .into_iter()
            .map(|(_, level)| level)
            .filter(|&level| level > price)
            .fold(f64::INFINITY, f64::min);

        let support_dist = price - support;
        let resistance_dist = resistance - price;
        let near_support = support.is_finite() && support_dist <= band;
        let near_resistance = resistance.is_finite() && resistance_dist <= band;

        match (near_support, near_resistance) {
            (true, false) => Ok(IndicatorVote::bullish(
                self.name(),
                1.0 - support_dist / band,
            )),
            (false, true) => Ok(IndicatorVote::bearish(
                self.name(),
                1.0 - resistance_dist / band,
            )),
            (true, true) => {
                if support_dist < resistance_dist {
                    Ok(IndicatorVote::bullish(self.name(), 1.0 - support_dist / band))
                } else if resistance_dist < support_dist {
                    Ok(IndicatorVote::bearish(
                        self.name(),
                        1.0 - resistance_dist / band,
                    ))
                } else {
                    Ok(IndicatorVote::neutral(self.name()))
                }
            }
            (false, false) => Ok(IndicatorVote::neutral(self.name())),
        }
    }
}
