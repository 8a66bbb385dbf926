//! Position sizing.
//!
//! Classic fixed-fractional risk: risk a percentage of equity per trade,
//! with size determined by the distance between entry and stop.
//!
//! ```text
//! risk_amount = equity * risk_pct
//! units = risk_amount / |entry - stop|
//! ```
//! The result is floored to a multiple of the minimum tradable unit and
//! clamped up to one minimum unit when positive risk would otherwise
//! round away to nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum SizingError {
    #[error("invalid stop distance: entry {entry} and stop {stop} coincide")]
    InvalidStopDistance { entry: f64, stop: f64 },
}

/// Derived, not persisted — recomputed on each pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSizeRecommendation {
    /// Suggested size in minimum-unit multiples (lots for FX-style symbols).
    pub units: f64,
    /// Capital at risk if the stop is hit.
    pub risk_amount: f64,
    /// |entry - stop| used for the division.
    pub stop_distance: f64,
}

#[derive(Debug, Clone)]
pub struct PositionSizer {
    min_unit: f64,
}

impl PositionSizer {
    pub fn new(min_unit: f64) -> Self {
        assert!(
            min_unit > 0.0 && min_unit.is_finite(),
            "min_unit must be positive and finite"
        );
        Self { min_unit }
    }

    /// Size a position from account equity, risk fraction, and stop placement.
    ///
    /// Fails with `InvalidStopDistance` when entry and stop coincide (or are
    /// non-finite) — the division is guarded explicitly, never silently.
    pub fn size(
        &self,
        equity: f64,
        risk_pct: f64,
        entry: f64,
        stop: f64,
    ) -> Result<PositionSizeRecommendation, SizingError> {
        let stop_distance = (entry - stop).abs();
        if !stop_distance.is_finite() || stop_distance == 0.0 {
            return Err(SizingError::InvalidStopDistance { entry, stop });
        }

        let risk_amount = (equity * risk_pct).max(0.0);
        let raw_units = risk_amount / stop_distance;

        // Floor to a multiple of min_unit; the epsilon absorbs binary
        // rounding on exact multiples.
        let mut units = ((raw_units / self.min_unit) + 1e-9).floor() * self.min_unit;
        if risk_amount > 0.0 && units < self.min_unit {
            units = self.min_unit;
        }

        Ok(PositionSizeRecommendation {
            units,
            risk_amount,
            stop_distance,
        })
    }
}
