//! Auric Core — market data ingestion and technical signal engine.
//!
//! This crate contains the whole signal pipeline:
//! - Domain types (bars, snapshots, timeframes, account metadata)
//! - Snapshot reader with typed failure modes and a synthetic fallback
//! - Bar series normalization and H1/D1 resampling
//! - Indicator library (pure series math) and the vote battery
//! - Candlestick pattern detection
//! - Deterministic weighted-vote aggregation with a ranging-market gate
//! - Position sizing and the atomically swapped result cache
//!
//! The HTTP/serving layer, dashboard, and the exporter process are
//! external collaborators: they hand this crate a filesystem location and
//! receive a `CompositeSignal` value.

pub mod cache;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod signal;
pub mod sizers;
pub mod votes;

pub use cache::{CachedResult, ResultCache, SnapshotId};
pub use config::EngineConfig;
pub use domain::{Bar, SeriesSet, Snapshot, SnapshotSource, Timeframe};
pub use engine::SignalEngine;
pub use signal::{
    Classification, CompositeSignal, Direction, IndicatorVote, PatternKind, PatternMatch,
};
pub use sizers::{PositionSizeRecommendation, PositionSizer, SizingError};
