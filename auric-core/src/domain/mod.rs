//! Domain types: bars, snapshots, timeframes, account metadata.

pub mod bar;
pub mod snapshot;

pub use bar::Bar;
pub use snapshot::{
    AccountMetrics, BrokerInfo, SeriesSet, Snapshot, SnapshotSource, Timeframe,
};
