//! Bar series normalization and resampling.
//!
//! Raw exporter arrays may arrive unsorted and may contain duplicate
//! timestamps from overlapping writes. Normalization produces an
//! ascending, de-duplicated (last write wins), look-back-truncated series
//! per timeframe. When the exporter omits the hourly or daily arrays they
//! are rebuilt from the 5-minute series by bucketing.

use chrono::{NaiveDateTime, Timelike};

use crate::config::LookbackConfig;
use crate::domain::{Bar, SeriesSet, Timeframe};

/// Minimum M5 bars required to emit an hourly bucket (12 would be full).
const MIN_H1_BUCKET: usize = 3;
/// Minimum M5 bars required to emit a daily bucket (288 would be full).
const MIN_D1_BUCKET: usize = 10;

/// Sort ascending, keep the last write per timestamp, truncate to the
/// trailing `lookback` bars. Idempotent.
pub fn normalize(mut bars: Vec<Bar>, lookback: usize) -> Vec<Bar> {
    // Stable sort: among duplicate timestamps the later write stays later,
    // so "last wins" falls out of keeping the final element per key.
    bars.sort_by_key(|b| b.timestamp);

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => out.push(bar),
        }
    }

    if out.len() > lookback {
        out.drain(..out.len() - lookback);
    }
    out
}

/// Resample a normalized M5 series into H1 or D1 buckets.
///
/// Bucket OHLCV: open of the first bar, max high, min low, close of the
/// last bar, summed volume. Buckets with too few constituent bars are
/// dropped (partial hours at the edges of the export).
pub fn resample(m5: &[Bar], target: Timeframe) -> Vec<Bar> {
    let (key, min_bucket): (fn(NaiveDateTime) -> NaiveDateTime, usize) = match target {
        Timeframe::H1 => (hour_key, MIN_H1_BUCKET),
        Timeframe::D1 => (day_key, MIN_D1_BUCKET),
        Timeframe::M5 => return m5.to_vec(),
    };

    let mut out = Vec::new();
    let mut bucket: Vec<&Bar> = Vec::new();
    let mut bucket_key: Option<NaiveDateTime> = None;

    for bar in m5 {
        let k = key(bar.timestamp);
        if bucket_key != Some(k) {
            if let Some(folded) = fold_bucket(&bucket, bucket_key, min_bucket) {
                out.push(folded);
            }
            bucket.clear();
            bucket_key = Some(k);
        }
        bucket.push(bar);
    }
    if let Some(folded) = fold_bucket(&bucket, bucket_key, min_bucket) {
        out.push(folded);
    }

    out
}

fn fold_bucket(bucket: &[&Bar], key: Option<NaiveDateTime>, min_bucket: usize) -> Option<Bar> {
    let key = key?;
    if bucket.len() < min_bucket {
        return None;
    }
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut volume: u64 = 0;
    for bar in bucket {
        high = high.max(bar.high);
        low = low.min(bar.low);
        volume += bar.volume;
    }
    Some(Bar {
        timestamp: key,
        open: bucket.first()?.open,
        high,
        low,
        close: bucket.last()?.close,
        volume,
    })
}

fn hour_key(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_hms_opt(t.hour(), 0, 0).unwrap_or(t)
}

fn day_key(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_hms_opt(0, 0, 0).unwrap_or(t)
}

/// Build the full normalized series set from raw exporter arrays,
/// resampling the hourly and daily series from M5 when absent.
pub fn build_series(
    m5: Vec<Bar>,
    h1: Vec<Bar>,
    d1: Vec<Bar>,
    lookback: &LookbackConfig,
) -> SeriesSet {
    let m5 = normalize(m5, lookback.m5);

    let h1 = if h1.is_empty() {
        let mut resampled = resample(&m5, Timeframe::H1);
        if resampled.len() > lookback.h1 {
            resampled.drain(..resampled.len() - lookback.h1);
        }
        resampled
    } else {
        normalize(h1, lookback.h1)
    };

    let d1 = if d1.is_empty() {
        let mut resampled = resample(&m5, Timeframe::D1);
        if resampled.len() > lookback.d1 {
            resampled.drain(..resampled.len() - lookback.d1);
        }
        resampled
    } else {
        normalize(d1, lookback.d1)
    };

    let mut set = SeriesSet::new();
    set.insert(Timeframe::M5, m5);
    set.insert(Timeframe::H1, h1);
    set.insert(Timeframe::D1, d1);
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar_at(minute_offset: i64, close: f64) -> Bar {
        let base = NaiveDate::from_ymd_opt(2026, 2, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Bar {
            timestamp: base + chrono::Duration::minutes(minute_offset),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.5,
            close,
            volume: 100,
        }
    }

    #[test]
    fn normalize_sorts_ascending() {
        let bars = vec![bar_at(10, 102.0), bar_at(0, 100.0), bar_at(5, 101.0)];
        let result = normalize(bars, 10);
        let closes: Vec<f64> = result.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn normalize_dedup_keeps_last_write() {
        // Overlapping exporter writes: the same candle appears twice, the
        // later element carrying the updated close.
        let bars = vec![bar_at(0, 100.0), bar_at(5, 101.0), bar_at(5, 105.0)];
        let result = normalize(bars, 10);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].close, 105.0);
    }

    #[test]
    fn normalize_truncates_to_lookback() {
        let bars: Vec<Bar> = (0..30).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        let result = normalize(bars, 10);
        assert_eq!(result.len(), 10);
        // The trailing bars survive, not the leading ones.
        assert_eq!(result[0].close, 120.0);
        assert_eq!(result[9].close, 129.0);
    }

    #[test]
    fn normalize_is_idempotent() {
        let bars = vec![bar_at(10, 102.0), bar_at(0, 100.0), bar_at(5, 101.0)];
        let once = normalize(bars, 10);
        let twice = normalize(once.clone(), 10);
        assert_eq!(once, twice);
    }

    #[test]
    fn resample_h1_buckets_twelve_m5_bars() {
        // Two full hours of M5 bars starting at 09:00.
        let bars: Vec<Bar> = (0..24).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        let h1 = resample(&bars, Timeframe::H1);
        assert_eq!(h1.len(), 2);

        let first = &h1[0];
        assert_eq!(first.timestamp.hour(), 9);
        assert_eq!(first.open, 99.5); // open of the 09:00 bar
        assert_eq!(first.close, 111.0); // close of the 09:55 bar
        assert_eq!(first.high, 112.0); // high of the 09:55 bar
        assert_eq!(first.low, 98.5); // low of the 09:00 bar
        assert_eq!(first.volume, 1200);
    }

    #[test]
    fn resample_drops_sparse_buckets() {
        // Two M5 bars in one hour: below the 3-bar minimum.
        let bars = vec![bar_at(0, 100.0), bar_at(5, 101.0)];
        assert!(resample(&bars, Timeframe::H1).is_empty());
    }

    #[test]
    fn resample_d1_needs_ten_bars() {
        let bars: Vec<Bar> = (0..9).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        assert!(resample(&bars, Timeframe::D1).is_empty());

        let bars: Vec<Bar> = (0..12).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        let d1 = resample(&bars, Timeframe::D1);
        assert_eq!(d1.len(), 1);
        assert_eq!(d1[0].timestamp.hour(), 0);
        assert_eq!(d1[0].volume, 1200);
    }

    #[test]
    fn build_series_resamples_missing_timeframes() {
        let m5: Vec<Bar> = (0..36).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        let set = build_series(m5, Vec::new(), Vec::new(), &LookbackConfig::default());
        assert_eq!(set.len(Timeframe::M5), 36);
        assert_eq!(set.len(Timeframe::H1), 3);
        assert_eq!(set.len(Timeframe::D1), 1);
    }

    #[test]
    fn build_series_prefers_exported_timeframes() {
        let m5: Vec<Bar> = (0..36).map(|i| bar_at(5 * i, 100.0 + i as f64)).collect();
        let h1 = vec![bar_at(0, 500.0), bar_at(60, 501.0)];
        let set = build_series(m5, h1, Vec::new(), &LookbackConfig::default());
        assert_eq!(set.len(Timeframe::H1), 2);
        assert_eq!(set.get(Timeframe::H1)[0].close, 500.0);
    }
}
