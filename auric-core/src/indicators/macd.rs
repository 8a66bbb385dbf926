//! MACD — Moving Average Convergence/Divergence.
//!
//! Line: EMA(fast) - EMA(slow), default 12/26.
//! Signal: EMA of the line, default 9 — the real recursion over the MACD
//! line, seeded once the line has `signal_period` valid values.
//! Histogram: line - signal.
//! Lookback: slow_period + signal_period - 2.

use crate::domain::Bar;
use crate::indicators::ema::{ema, ema_of_series};

/// The three MACD output series, index-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
    assert!(signal_period >= 1, "MACD signal period must be >= 1");

    let n = bars.len();
    let fast_ema = ema(bars, fast);
    let slow_ema = ema(bars, slow);

    let mut line = vec![f64::NAN; n];
    for i in 0..n {
        if !fast_ema[i].is_nan() && !slow_ema[i].is_nan() {
            line[i] = fast_ema[i] - slow_ema[i];
        }
    }

    let signal = ema_of_series(&line, signal_period);

    let mut histogram = vec![f64::NAN; n];
    for i in 0..n {
        if !line[i].is_nan() && !signal[i].is_nan() {
            histogram[i] = line[i] - signal[i];
        }
    }

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn macd_warmup_lengths() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64) * 0.5).collect();
        let bars = make_bars(&closes);
        let m = macd(&bars, 12, 26, 9);

        assert_eq!(m.line.len(), 40);
        // Line becomes valid once the slow EMA is seeded (index 25).
        assert!(m.line[24].is_nan());
        assert!(!m.line[25].is_nan());
        // Signal needs 9 valid line values: first at index 25 + 9 - 1 = 33.
        assert!(m.signal[32].is_nan());
        assert!(!m.signal[33].is_nan());
        assert!(!m.histogram[33].is_nan());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let bars = make_bars(&[100.0; 40]);
        let m = macd(&bars, 12, 26, 9);
        assert_approx(m.line[39], 0.0, DEFAULT_EPSILON);
        assert_approx(m.signal[39], 0.0, DEFAULT_EPSILON);
        assert_approx(m.histogram[39], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // Accelerating uptrend: fast EMA pulls ahead of slow EMA.
        let closes: Vec<f64> = (0..40).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let bars = make_bars(&closes);
        let m = macd(&bars, 12, 26, 9);
        assert!(m.line[39] > 0.0);
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let bars = make_bars(&closes);
        let m = macd(&bars, 12, 26, 9);
        for i in 0..40 {
            if !m.histogram[i].is_nan() {
                assert_approx(m.histogram[i], m.line[i] - m.signal[i], DEFAULT_EPSILON);
            }
        }
    }

    #[test]
    #[should_panic(expected = "slow > fast")]
    fn macd_rejects_fast_geq_slow() {
        let bars = make_bars(&[100.0; 10]);
        macd(&bars, 26, 12, 9);
    }
}
