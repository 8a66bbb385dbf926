//! Result cache — the one shared mutable resource in the pipeline.
//!
//! Holds the most recent composite signal together with the identity of
//! the snapshot it was derived from. Publishes are an atomic `Arc` swap
//! under a momentary write lock; reads clone the `Arc` under a momentary
//! read lock. All computation happens outside any lock, so readers never
//! block on a concurrent recompute, and a failed ingestion cycle can
//! never clear or corrupt the previously published result.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::domain::Snapshot;
use crate::signal::CompositeSignal;

/// Content identity of a snapshot: capture time plus a hash of the fields
/// that matter for recomputation. Compared by value, never by any
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotId([u8; 32]);

impl SnapshotId {
    pub fn of(snapshot: &Snapshot) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(snapshot.symbol.as_bytes());
        hasher.update(&snapshot.captured_at.timestamp_millis().to_le_bytes());
        hasher.update(&snapshot.bid.to_bits().to_le_bytes());
        hasher.update(&snapshot.ask.to_bits().to_le_bytes());
        for timeframe in [
            crate::domain::Timeframe::M5,
            crate::domain::Timeframe::H1,
            crate::domain::Timeframe::D1,
        ] {
            let bars = snapshot.series.get(timeframe);
            hasher.update(&(bars.len() as u64).to_le_bytes());
            if let Some(last) = bars.last() {
                hasher.update(&last.timestamp.and_utc().timestamp().to_le_bytes());
                hasher.update(&last.close.to_bits().to_le_bytes());
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// One published computation: the signal plus the snapshot it came from.
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub snapshot_id: SnapshotId,
    pub signal: CompositeSignal,
    pub computed_at: DateTime<Utc>,
}

pub struct ResultCache {
    slot: RwLock<Option<Arc<CachedResult>>>,
    refresh_interval: Duration,
}

impl ResultCache {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            refresh_interval,
        }
    }

    /// The last published result, if any. Never blocks on a recompute.
    pub fn get(&self) -> Option<Arc<CachedResult>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True when the cached entry was derived from the same snapshot and
    /// is younger than the refresh interval — i.e. recomputation can be
    /// skipped.
    pub fn is_current(&self, id: &SnapshotId, now: DateTime<Utc>) -> bool {
        match self.get() {
            Some(entry) => {
                entry.snapshot_id == *id && now - entry.computed_at < self.refresh_interval
            }
            None => false,
        }
    }

    /// Atomically replace the cached entry.
    pub fn publish(&self, result: CachedResult) -> Arc<CachedResult> {
        let entry = Arc::new(result);
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "cache publish: {} {} @ {}",
            entry.signal.classification.as_str(),
            entry.signal.confidence,
            entry.computed_at
        );
        *slot = Some(Arc::clone(&entry));
        entry
    }
}
