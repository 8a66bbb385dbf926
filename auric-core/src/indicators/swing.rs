//! Swing highs and lows — local extrema used as support/resistance levels.
//!
//! A swing high at index i has a high strictly greater than the highs of
//! the `window` bars on each side; a swing low mirrors with lows. Bars too
//! close to either edge cannot qualify.

use crate::domain::Bar;

/// Indices and prices of swing highs over the series.
pub fn swing_highs(bars: &[Bar], window: usize) -> Vec<(usize, f64)> {
    extrema(bars, window, |b| b.high, |candidate, other| candidate > other)
}

/// Indices and prices of swing lows over the series.
pub fn swing_lows(bars: &[Bar], window: usize) -> Vec<(usize, f64)> {
    extrema(bars, window, |b| b.low, |candidate, other| candidate < other)
}

fn extrema(
    bars: &[Bar],
    window: usize,
    price: impl Fn(&Bar) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<(usize, f64)> {
    let n = bars.len();
    let mut out = Vec::new();

    if window == 0 || n < 2 * window + 1 {
        return out;
    }

    for i in window..(n - window) {
        let candidate = price(&bars[i]);
        if candidate.is_nan() {
            continue;
        }

        let mut is_extremum = true;
        for j in (i - window)..=(i + window) {
            if j == i {
                continue;
            }
            let other = price(&bars[j]);
            if other.is_nan() || !beats(candidate, other) {
                is_extremum = false;
                break;
            }
        }
        if is_extremum {
            out.push((i, candidate));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn finds_single_swing_high() {
        // Peak at index 2.
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.5),
            (100.5, 103.0, 100.0, 102.0),
            (102.0, 107.0, 101.0, 104.0),
            (104.0, 105.0, 101.0, 102.0),
            (102.0, 103.0, 99.0, 100.0),
        ]);
        let highs = swing_highs(&bars, 2);
        assert_eq!(highs, vec![(2, 107.0)]);
    }

    #[test]
    fn finds_single_swing_low() {
        // Trough at index 2.
        let bars = make_ohlc_bars(&[
            (100.0, 101.0, 99.0, 100.0),
            (100.0, 100.5, 97.0, 98.0),
            (98.0, 99.0, 94.0, 96.0),
            (96.0, 99.5, 95.0, 99.0),
            (99.0, 101.0, 98.0, 100.0),
        ]);
        let lows = swing_lows(&bars, 2);
        assert_eq!(lows, vec![(2, 94.0)]);
    }

    #[test]
    fn flat_series_has_no_swings() {
        let bars = make_ohlc_bars(&[(100.0, 100.0, 100.0, 100.0); 9]);
        assert!(swing_highs(&bars, 2).is_empty());
        assert!(swing_lows(&bars, 2).is_empty());
    }

    #[test]
    fn too_short_series_has_no_swings() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 100.0); 4]);
        assert!(swing_highs(&bars, 2).is_empty());
    }

    #[test]
    fn edge_bars_never_qualify() {
        // Highest high at index 0 — not a swing (no left neighbors).
        let bars = make_ohlc_bars(&[
            (100.0, 120.0, 99.0, 101.0),
            (101.0, 102.0, 100.0, 101.5),
            (101.5, 103.0, 100.5, 102.0),
            (102.0, 104.0, 101.0, 103.0),
            (103.0, 105.0, 102.0, 104.0),
        ]);
        let highs = swing_highs(&bars, 2);
        assert!(highs.iter().all(|&(i, _)| i != 0));
    }
}
