//! Engine configuration.
//!
//! Every tunable the pipeline consumes lives here with a documented
//! default, serde round-trippable and loadable from a TOML file. Partial
//! files work: any omitted field or section takes its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Snapshot freshness thresholds, in seconds.
///
/// `max_age_secs` is the hard cutoff after which a snapshot is rejected as
/// stale; `tick_max_age_secs` is advisory and only flags the tick fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    pub max_age_secs: u64,
    pub tick_max_age_secs: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 300,
            tick_max_age_secs: 30,
        }
    }
}

/// Per-timeframe look-back counts applied by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookbackConfig {
    pub m5: usize,
    pub h1: usize,
    pub d1: usize,
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            m5: 200,
            h1: 120,
            d1: 90,
        }
    }
}

/// Fixed per-indicator vote weights. The defaults sum to 100, the
/// normalization base of the aggregate score; weights of skipped
/// indicators are NOT redistributed, so sparse data yields lower
/// confidence by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorWeights {
    pub ma_cross: f64,
    pub macd: f64,
    pub rsi: f64,
    pub stochastic: f64,
    pub bollinger: f64,
    pub support_resistance: f64,
    pub htf_trend: f64,
    pub volume: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            ma_cross: 20.0,
            macd: 20.0,
            rsi: 13.0,
            stochastic: 12.0,
            bollinger: 10.0,
            support_resistance: 10.0,
            htf_trend: 10.0,
            volume: 5.0,
        }
    }
}

impl IndicatorWeights {
    /// Weight for a vote source by name; unknown names carry no weight.
    pub fn weight_for(&self, indicator: &str) -> f64 {
        match indicator {
            "ma_cross" => self.ma_cross,
            "macd" => self.macd,
            "rsi" => self.rsi,
            "stochastic" => self.stochastic,
            "bollinger" => self.bollinger,
            "support_resistance" => self.support_resistance,
            "htf_trend" => self.htf_trend,
            "volume" => self.volume,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.ma_cross
            + self.macd
            + self.rsi
            + self.stochastic
            + self.bollinger
            + self.support_resistance
            + self.htf_trend
            + self.volume
    }
}

/// Shape of the synthetic fallback snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub symbol: String,
    pub base_price: f64,
    pub bars: usize,
    pub spread: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            symbol: "XAUEUR".to_string(),
            base_price: 2650.0,
            bars: 220,
            spread: 0.5,
        }
    }
}

/// Complete configuration surface consumed by the signal engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidate snapshot export files, probed in order of preference.
    pub snapshot_paths: Vec<PathBuf>,
    pub freshness: FreshnessConfig,
    /// How long a last-good live result may be re-served (tagged
    /// stale-cache) after ingestion starts failing.
    pub stale_cache_max_secs: u64,
    /// Minimum interval between recomputes for an unchanged snapshot.
    pub refresh_interval_secs: u64,
    pub lookback: LookbackConfig,
    pub weights: IndicatorWeights,
    /// Symmetric classification threshold: score above +threshold is BUY,
    /// below -threshold is SELL, otherwise HOLD.
    pub signal_threshold: f64,
    /// ADX below this value marks a ranging market.
    pub adx_ranging_threshold: f64,
    /// Multiplier applied to the aggregate score in a ranging market.
    pub ranging_factor: f64,
    /// How many trailing bars the pattern detector scans.
    pub pattern_window: usize,
    pub pattern_min_confidence: f64,
    pub risk_pct_default: f64,
    /// Minimum tradable unit for position sizing.
    pub min_unit: f64,
    /// Stop distance for the ATR-derived recommendation, in ATR multiples.
    pub atr_stop_multiple: f64,
    pub synthetic: SyntheticConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshot_paths: Vec::new(),
            freshness: FreshnessConfig::default(),
            stale_cache_max_secs: 600,
            refresh_interval_secs: 5,
            lookback: LookbackConfig::default(),
            weights: IndicatorWeights::default(),
            signal_threshold: 10.0,
            adx_ranging_threshold: 20.0,
            ranging_factor: 0.7,
            pattern_window: 5,
            pattern_min_confidence: 0.3,
            risk_pct_default: 0.01,
            min_unit: 0.01,
            atr_stop_multiple: 2.0,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
