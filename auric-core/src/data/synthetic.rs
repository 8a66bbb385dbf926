//! Synthetic snapshot generator — the fallback when no real export is
//! usable.
//!
//! Produces a plausible random walk around a configured base price so the
//! whole pipeline is exercised uniformly in demo/no-data conditions. The
//! snapshot is deterministic for a given seed and is always labeled
//! `source = synthetic`; downstream consumers must never mistake it for
//! live data.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{LookbackConfig, SyntheticConfig};
use crate::data::normalize::build_series;
use crate::domain::{
    AccountMetrics, Bar, BrokerInfo, Snapshot, SnapshotSource, Timeframe,
};

pub struct SyntheticGenerator {
    config: SyntheticConfig,
    lookback: LookbackConfig,
}

impl SyntheticGenerator {
    pub fn new(config: SyntheticConfig, lookback: LookbackConfig) -> Self {
        assert!(config.bars >= 2, "synthetic series needs at least 2 bars");
        assert!(
            config.base_price > 0.0,
            "synthetic base price must be positive"
        );
        Self { config, lookback }
    }

    /// Generate a complete labeled snapshot ending at `now`.
    pub fn generate(&self, now: DateTime<Utc>) -> Snapshot {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let base = self.config.base_price;
        let typical_range = base * 0.015; // 1.5% working range
        let bar_range = typical_range * 0.1;
        let count = self.config.bars;

        // Anchor bar timestamps to 5-minute boundaries ending at `now`.
        let naive_now = now.naive_utc();
        let anchor = naive_now
            .date()
            .and_hms_opt(naive_now.hour(), (naive_now.minute() / 5) * 5, 0)
            .unwrap_or(naive_now);

        let mut bars = Vec::with_capacity(count);
        let mut price = base;
        for i in 0..count {
            // Slow sine drift keeps the walk oscillating around the base
            // instead of wandering off.
            let center = base + (i as f64 * 0.3).sin() * typical_range * 0.3;
            let noise = rng.gen_range(-1.0..1.0) * typical_range * 0.05;
            price += (center - price) * 0.1 + noise;

            let (open, close) = if noise >= 0.0 {
                (price - bar_range * 0.2, price + bar_range * 0.2)
            } else {
                (price + bar_range * 0.2, price - bar_range * 0.2)
            };

            bars.push(Bar {
                timestamp: anchor - Duration::minutes(5 * (count - 1 - i) as i64),
                open,
                high: price + bar_range,
                low: price - bar_range,
                close,
                volume: 1000 + rng.gen_range(0..500),
            });
        }

        let bid = bars.last().map(|b| b.close).unwrap_or(base);
        let series = build_series(bars, Vec::new(), Vec::new(), &self.lookback);

        let last_d1 = series.get(Timeframe::D1).last().cloned();
        Snapshot {
            symbol: self.config.symbol.clone(),
            captured_at: now,
            bid,
            ask: bid + self.config.spread,
            daily_high: last_d1.as_ref().map(|b| b.high).unwrap_or(bid),
            daily_low: last_d1.as_ref().map(|b| b.low).unwrap_or(bid),
            daily_open: last_d1.as_ref().map(|b| b.open).unwrap_or(bid),
            tick_volume: 0,
            series,
            account: AccountMetrics::default(),
            broker: BrokerInfo {
                name: "Synthetic".to_string(),
                server: "None".to_string(),
            },
            source: SnapshotSource::Synthetic,
            tick_stale: false,
        }
    }
}
