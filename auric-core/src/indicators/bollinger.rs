//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Middle: SMA(close, period); Upper/Lower: middle +/- mult * stddev.
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::domain::Bar;

/// Upper/middle/lower band series, index-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(bars: &[Bar], period: usize, multiplier: f64) -> BollingerSeries {
    assert!(period >= 1, "Bollinger period must be >= 1");

    let n = bars.len();
    let mut upper = vec![f64::NAN; n];
    let mut middle = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if n >= period {
        for i in (period - 1)..n {
            let window = &bars[i + 1 - period..=i];

            let mut has_nan = false;
            let mut sum = 0.0;
            for bar in window {
                if bar.close.is_nan() {
                    has_nan = true;
                    break;
                }
                sum += bar.close;
            }
            if has_nan {
                continue;
            }

            let mean = sum / period as f64;
            let variance: f64 = window
                .iter()
                .map(|bar| {
                    let diff = bar.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let stddev = variance.sqrt();

            middle[i] = mean;
            upper[i] = mean + multiplier * stddev;
            lower[i] = mean - multiplier * stddev;
        }
    }

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
