//! Snapshot reader — loads the latest market data export from disk.
//!
//! The exporter writes one of several candidate JSON files; the reader
//! probes them in order of preference on every call (no caching of its
//! own, the OS page cache is enough) and keeps the first parseable
//! candidate. Failures come back as a typed `SnapshotError`; the engine
//! absorbs them by falling back, never by propagating.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{FreshnessConfig, LookbackConfig};
use crate::data::normalize::build_series;
use crate::domain::{
    AccountMetrics, Bar, BrokerInfo, Snapshot, SnapshotSource, Timeframe,
};

/// Timestamp format used by the exporter ("2026.02.03 14:05:00").
const EXPORT_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot file found at any configured path")]
    NotFound,

    #[error("snapshot is stale: {age_secs}s old, max {max_age_secs}s")]
    Stale { age_secs: i64, max_age_secs: u64 },

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

/// Raw bar as written by the exporter. Accepts both the compact
/// (`o/h/l/c/v`) and spelled-out key styles.
#[derive(Debug, Clone, Deserialize)]
struct RawBar {
    time: String,
    #[serde(alias = "o")]
    open: f64,
    #[serde(alias = "h")]
    high: f64,
    #[serde(alias = "l")]
    low: f64,
    #[serde(alias = "c")]
    close: f64,
    #[serde(alias = "v", default)]
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    symbol: Option<String>,
    updated: Option<String>,
    /// Unix seconds; preferred capture-time source when present.
    timestamp: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    daily_high: Option<f64>,
    daily_low: Option<f64>,
    daily_open: Option<f64>,
    tick_volume: Option<f64>,
    bars: Option<Vec<RawBar>>,
    bars_h1: Option<Vec<RawBar>>,
    bars_d1: Option<Vec<RawBar>>,
    account: Option<AccountMetrics>,
    broker: Option<BrokerInfo>,
}

pub struct SnapshotReader {
    paths: Vec<PathBuf>,
    freshness: FreshnessConfig,
    lookback: LookbackConfig,
}

impl SnapshotReader {
    pub fn new(paths: Vec<PathBuf>, freshness: FreshnessConfig, lookback: LookbackConfig) -> Self {
        Self {
            paths,
            freshness,
            lookback,
        }
    }

    /// Read the first parseable snapshot among the candidate files,
    /// probed in order of preference.
    ///
    /// `NotFound` when no candidate exists, `Malformed` when every
    /// existing candidate fails validation, `Stale` when the winning
    /// candidate is older than the hard freshness cutoff.
    pub fn read(&self, now: DateTime<Utc>) -> Result<Snapshot, SnapshotError> {
        let existing: Vec<&PathBuf> = self.paths.iter().filter(|p| p.exists()).collect();
        if existing.is_empty() {
            return Err(SnapshotError::NotFound);
        }

        let mut parsed: Option<Snapshot> = None;
        let mut last_reason = String::new();

        for path in existing {
            match self.load_candidate(path) {
                Ok(snapshot) => {
                    parsed = Some(snapshot);
                    break;
                }
                Err(reason) => {
                    warn!("skipping snapshot candidate {}: {reason}", path.display());
                    last_reason = reason;
                }
            }
        }

        let mut snapshot = match parsed {
            Some(s) => s,
            None => return Err(SnapshotError::Malformed(last_reason)),
        };

        let age_secs = snapshot.age_secs(now);
        if age_secs > self.freshness.max_age_secs as i64 {
            return Err(SnapshotError::Stale {
                age_secs,
                max_age_secs: self.freshness.max_age_secs,
            });
        }
        snapshot.tick_stale = age_secs > self.freshness.tick_max_age_secs as i64;

        Ok(snapshot)
    }

    fn load_candidate(&self, path: &Path) -> Result<Snapshot, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("read failed: {e}"))?;
        let raw: RawSnapshot =
            serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))?;

        let bid = raw
            .bid
            .ok_or_else(|| "missing required field `bid`".to_string())?;
        if !bid.is_finite() || bid <= 0.0 {
            return Err(format!("non-numeric bid: {bid}"));
        }
        let ask = match raw.ask {
            Some(a) if a.is_finite() && a > 0.0 => a,
            Some(a) => return Err(format!("non-numeric ask: {a}")),
            None => bid,
        };

        let raw_bars = raw
            .bars
            .clone()
            .ok_or_else(|| "missing required field `bars`".to_string())?;
        if raw_bars.is_empty() {
            return Err("empty `bars` array".to_string());
        }

        let m5 = convert_bars(raw_bars, "bars")?;
        let h1 = convert_bars(raw.bars_h1.clone().unwrap_or_default(), "bars_h1")?;
        let d1 = convert_bars(raw.bars_d1.clone().unwrap_or_default(), "bars_d1")?;
        let series = build_series(m5, h1, d1, &self.lookback);

        let captured_at = capture_time(&raw, path)?;

        // Daily fields fall back to the last daily candle, then to the bid.
        let last_d1 = series.get(Timeframe::D1).last().cloned();
        let daily_high = raw
            .daily_high
            .or_else(|| last_d1.as_ref().map(|b| b.high))
            .unwrap_or(bid);
        let daily_low = raw
            .daily_low
            .or_else(|| last_d1.as_ref().map(|b| b.low))
            .unwrap_or(bid);
        let daily_open = raw
            .daily_open
            .or_else(|| last_d1.as_ref().map(|b| b.open))
            .unwrap_or(bid);

        Ok(Snapshot {
            symbol: raw.symbol.unwrap_or_else(|| "XAUEUR".to_string()),
            captured_at,
            bid,
            ask,
            daily_high,
            daily_low,
            daily_open,
            tick_volume: raw.tick_volume.map(|v| v.max(0.0) as u64).unwrap_or(0),
            series,
            account: raw.account.unwrap_or_default(),
            broker: raw.broker.unwrap_or_default(),
            source: SnapshotSource::Live,
            tick_stale: false,
        })
    }
}

fn convert_bars(raw: Vec<RawBar>, field: &str) -> Result<Vec<Bar>, String> {
    let mut bars = Vec::with_capacity(raw.len());
    for (i, rb) in raw.into_iter().enumerate() {
        let timestamp = NaiveDateTime::parse_from_str(&rb.time, EXPORT_TIME_FORMAT)
            .map_err(|_| format!("{field}[{i}]: unparseable time {:?}", rb.time))?;
        let bar = Bar {
            timestamp,
            open: rb.open,
            high: rb.high,
            low: rb.low,
            close: rb.close,
            volume: rb.volume.max(0.0) as u64,
        };
        if !bar.is_sane() {
            return Err(format!(
                "{field}[{i}]: OHLC invariant violated (o={} h={} l={} c={})",
                bar.open, bar.high, bar.low, bar.close
            ));
        }
        bars.push(bar);
    }
    Ok(bars)
}

/// Capture time: the exporter's unix `timestamp`, else its `updated`
/// string, else the file's mtime.
fn capture_time(raw: &RawSnapshot, path: &Path) -> Result<DateTime<Utc>, String> {
    if let Some(ts) = raw.timestamp {
        if !ts.is_finite() || ts < 0.0 {
            return Err(format!("non-numeric timestamp: {ts}"));
        }
        return Utc
            .timestamp_opt(ts as i64, 0)
            .single()
            .ok_or_else(|| format!("out-of-range timestamp: {ts}"));
    }
    if let Some(updated) = &raw.updated {
        let naive = NaiveDateTime::parse_from_str(updated, EXPORT_TIME_FORMAT)
            .map_err(|_| format!("unparseable `updated` field: {updated:?}"))?;
        return Ok(Utc.from_utc_datetime(&naive));
    }
    let mtime = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| format!("no capture time and mtime unavailable: {e}"))?;
    Ok(DateTime::<Utc>::from(mtime))
}
