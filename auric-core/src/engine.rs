//! Pipeline orchestration: snapshot acquisition, vote fan-out,
//! aggregation, and cache publication.
//!
//! One pass per distinct snapshot: read (or fall back) → evaluate the
//! vote battery in parallel → detect patterns → aggregate → publish. The
//! engine always returns a usable result; the worst case is a labeled
//! synthetic or stale-cache signal, never an absent one.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rayon::prelude::*;

use crate::cache::{CachedResult, ResultCache, SnapshotId};
use crate::config::EngineConfig;
use crate::data::{SnapshotReader, SyntheticGenerator};
use crate::domain::{Snapshot, SnapshotSource, Timeframe};
use crate::indicators::{adx, atr};
use crate::signal::aggregate::AggregatorParams;
use crate::signal::{aggregate, Classification, CompositeSignal, PatternDetector};
use crate::sizers::{PositionSizeRecommendation, PositionSizer, SizingError};
use crate::votes::{default_sources, VoteSource};

/// ATR/ADX period on the primary timeframe. Matches the vote battery's
/// normalization period.
const TREND_PERIOD: usize = 14;

pub struct SignalEngine {
    config: EngineConfig,
    reader: SnapshotReader,
    synthetic: SyntheticGenerator,
    cache: ResultCache,
    sources: Vec<Box<dyn VoteSource>>,
    detector: PatternDetector,
    sizer: PositionSizer,
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        let reader = SnapshotReader::new(
            config.snapshot_paths.clone(),
            config.freshness.clone(),
            config.lookback.clone(),
        );
        let synthetic = SyntheticGenerator::new(config.synthetic.clone(), config.lookback.clone());
        let cache = ResultCache::new(Duration::seconds(config.refresh_interval_secs as i64));
        let detector = PatternDetector::new(config.pattern_window, config.pattern_min_confidence);
        let sizer = PositionSizer::new(config.min_unit);
        Self {
            reader,
            synthetic,
            cache,
            detector,
            sizer,
            sources: default_sources(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current composite signal, computed or served from cache.
    pub fn signal(&self) -> Arc<CachedResult> {
        self.signal_at(Utc::now())
    }

    /// Same as `signal` with an explicit clock, for deterministic tests
    /// and external schedulers.
    pub fn signal_at(&self, now: DateTime<Utc>) -> Arc<CachedResult> {
        match self.reader.read(now) {
            Ok(snapshot) => {
                let id = SnapshotId::of(&snapshot);
                if self.cache.is_current(&id, now) {
                    if let Some(hit) = self.cache.get() {
                        debug!("cache hit for snapshot {}", id.to_hex());
                        return hit;
                    }
                }
                let signal = self.compute(&snapshot, now);
                self.cache.publish(CachedResult {
                    snapshot_id: id,
                    signal,
                    computed_at: now,
                })
            }
            Err(err) => {
                warn!("snapshot ingestion failed ({err}); serving fallback");
                self.fallback(now)
            }
        }
    }

    /// Ingestion failed: re-serve the last good live result (labeled
    /// stale-cache) while it is recent enough, otherwise run the full
    /// pipeline on a synthetic snapshot. The cache keeps the last good
    /// entry either way.
    fn fallback(&self, now: DateTime<Utc>) -> Arc<CachedResult> {
        if let Some(prev) = self.cache.get() {
            let age_secs = (now - prev.computed_at).num_seconds();
            match prev.signal.source {
                SnapshotSource::Live if age_secs <= self.config.stale_cache_max_secs as i64 => {
                    let mut signal = prev.signal.clone();
                    signal.source = SnapshotSource::StaleCache;
                    return Arc::new(CachedResult {
                        snapshot_id: prev.snapshot_id.clone(),
                        signal,
                        computed_at: prev.computed_at,
                    });
                }
                SnapshotSource::Synthetic
                    if now - prev.computed_at
                        < Duration::seconds(self.config.refresh_interval_secs as i64) =>
                {
                    return prev;
                }
                _ => {}
            }
        }

        let snapshot = self.synthetic.generate(now);
        let id = SnapshotId::of(&snapshot);
        let signal = self.compute(&snapshot, now);
        self.cache.publish(CachedResult {
            snapshot_id: id,
            signal,
            computed_at: now,
        })
    }

    /// One full computation pass over an acquired snapshot.
    fn compute(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> CompositeSignal {
        let primary = snapshot.series.get(Timeframe::M5);
        let atr_value = last_finite(&atr(primary, TREND_PERIOD));
        let adx_value = last_finite(&adx(primary, TREND_PERIOD));

        // Vote sources are pure and independent: fan out across the pool,
        // each with its own read-only view of the series set.
        let outcomes: Vec<_> = self
            .sources
            .par_iter()
            .map(|source| (source.name(), source.evaluate(&snapshot.series)))
            .collect();

        let mut votes = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(vote) => votes.push(vote),
                Err(err) => {
                    debug!("vote source skipped: {err}");
                    skipped.push(name.to_string());
                }
            }
        }

        let patterns = self.detector.detect(primary);
        let verdict = aggregate(
            &votes,
            adx_value,
            &self.config.weights,
            &AggregatorParams {
                signal_threshold: self.config.signal_threshold,
                adx_ranging_threshold: self.config.adx_ranging_threshold,
                ranging_factor: self.config.ranging_factor,
            },
        );
        let position = self.recommend(snapshot, verdict.classification, atr_value);

        CompositeSignal {
            symbol: snapshot.symbol.clone(),
            classification: verdict.classification,
            confidence: verdict.confidence,
            score: verdict.score,
            votes,
            skipped,
            patterns,
            trend_strength: adx_value,
            atr: atr_value,
            position,
            source: snapshot.source,
            computed_at: now,
        }
    }

    /// ATR-derived sizing: stop placed `atr_stop_multiple` ATRs from the
    /// entry, on the protective side of the classification.
    fn recommend(
        &self,
        snapshot: &Snapshot,
        classification: Classification,
        atr_value: Option<f64>,
    ) -> Result<PositionSizeRecommendation, SizingError> {
        let entry = snapshot.bid;
        let distance = atr_value.unwrap_or(0.0) * self.config.atr_stop_multiple;
        let stop = match classification {
            Classification::Sell => entry + distance,
            _ => entry - distance,
        };
        self.sizer
            .size(snapshot.account.equity, self.config.risk_pct_default, entry, stop)
    }

    /// Position recommendation for the current signal: account equity at
    /// the configured risk fraction, stop one ATR multiple away.
    pub fn recommend_position(
        &self,
        now: DateTime<Utc>,
    ) -> Result<PositionSizeRecommendation, SizingError> {
        self.signal_at(now).signal.position.clone()
    }

    /// Direct pass-through sizing for caller-chosen entry and stop.
    pub fn position_size(
        &self,
        equity: f64,
        risk_pct: f64,
        entry: f64,
        stop: f64,
    ) -> Result<PositionSizeRecommendation, SizingError> {
        self.sizer.size(equity, risk_pct, entry, stop)
    }
}

fn last_finite(values: &[f64]) -> Option<f64> {
    values.iter().rev().find(|v| v.is_finite()).copied()
}
