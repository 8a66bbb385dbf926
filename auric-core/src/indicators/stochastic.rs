//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over
//! `k_period` bars; %D = SMA(%K, d_period).
//! Flat window (highest == lowest) → %K = 50.
//! Lookback: k_period + d_period - 2.

use crate::domain::Bar;
use crate::indicators::sma::sma_of_series;

/// %K and %D series, index-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticSeries {
    assert!(k_period >= 1, "stochastic %K period must be >= 1");
    assert!(d_period >= 1, "stochastic %D period must be >= 1");

    let n = bars.len();
    let mut k = vec![f64::NAN; n];

    if n >= k_period {
        for i in (k_period - 1)..n {
            let window = &bars[i + 1 - k_period..=i];

            let mut highest = f64::NEG_INFINITY;
            let mut lowest = f64::INFINITY;
            let mut has_nan = false;
            for bar in window {
                if bar.high.is_nan() || bar.low.is_nan() {
                    has_nan = true;
                    break;
                }
                highest = highest.max(bar.high);
                lowest = lowest.min(bar.low);
            }
            let close = bars[i].close;
            if has_nan || close.is_nan() {
                continue;
            }

            if highest == lowest {
                k[i] = 50.0;
            } else {
                k[i] = (100.0 * (close - lowest) / (highest - lowest)).clamp(0.0, 100.0);
            }
        }
    }

    let d = sma_of_series(&k, d_period);

    StochasticSeries { k, d }
}
