//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over `period` bars.
//! Lookback: period - 1.

use crate::domain::Bar;

/// SMA of closes. The first `period - 1` values are NaN.
pub fn sma(bars: &[Bar], period: usize) -> Vec<f64> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    sma_of_series(&closes, period)
}

/// SMA over an arbitrary f64 series. Used for volume averages and %D.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}
