//! Snapshot — one complete point-in-time market data payload.
//!
//! Produced atomically by the reader or the synthetic generator, treated as
//! an immutable value downstream. Discarded once a composite signal has been
//! derived from it; the engine retains no bar history of its own.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Bar;

/// Timeframe of a bar series. M5 is the primary timeframe; H1 and D1 are
/// either exported directly or resampled from M5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    M5,
    H1,
    D1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "m5",
            Timeframe::H1 => "h1",
            Timeframe::D1 => "d1",
        }
    }
}

/// Where a snapshot (and therefore the signal derived from it) came from.
///
/// `Synthetic` and `StaleCache` results must never be mistaken for live
/// data; the flag is propagated into `CompositeSignal` for UI disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotSource {
    Live,
    Synthetic,
    StaleCache,
}

/// Account block from the exporter. The exporter may omit it entirely,
/// in which case defaults apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountMetrics {
    pub balance: f64,
    pub equity: f64,
    pub margin: f64,
    pub free_margin: f64,
    pub currency: String,
}

impl Default for AccountMetrics {
    fn default() -> Self {
        Self {
            balance: 10_000.0,
            equity: 10_000.0,
            margin: 0.0,
            free_margin: 10_000.0,
            currency: "EUR".to_string(),
        }
    }
}

/// Broker block from the exporter; defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerInfo {
    pub name: String,
    pub server: String,
}

impl Default for BrokerInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            server: "Unknown".to_string(),
        }
    }
}

/// Normalized bar series per timeframe: ascending timestamps, no
/// duplicates, truncated to the configured look-back. Built by the
/// normalizer, consumed read-only by indicators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesSet {
    series: HashMap<Timeframe, Vec<Bar>>,
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, timeframe: Timeframe, bars: Vec<Bar>) {
        self.series.insert(timeframe, bars);
    }

    /// Bars for a timeframe; empty slice when the timeframe is absent.
    pub fn get(&self, timeframe: Timeframe) -> &[Bar] {
        self.series.get(&timeframe).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, timeframe: Timeframe) -> usize {
        self.get(timeframe).len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.values().all(Vec::is_empty)
    }
}

/// One complete market data snapshot: tick fields, per-timeframe bar
/// series, and account/broker metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub captured_at: DateTime<Utc>,
    pub bid: f64,
    pub ask: f64,
    pub daily_high: f64,
    pub daily_low: f64,
    pub daily_open: f64,
    pub tick_volume: u64,
    pub series: SeriesSet,
    pub account: AccountMetrics,
    pub broker: BrokerInfo,
    pub source: SnapshotSource,
    /// Tick fields older than the advisory tick freshness threshold.
    pub tick_stale: bool,
}

impl Snapshot {
    /// Age of the snapshot relative to `now`, in whole seconds.
    /// A capture time in the future counts as age zero.
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.captured_at).num_seconds().max(0)
    }
}
