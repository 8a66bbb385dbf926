//! Vote sources: per-indicator mapping from bar history to a directional
//! vote.
//!
//! Each source is a pure function of the normalized series set —
//! independent of every other source, so the engine may evaluate them in
//! any order or in parallel. A source that lacks history reports
//! `InsufficientHistory` and is skipped for the pass (its weight is not
//! redistributed); it never fails the pipeline.

pub mod bollinger;
pub mod htf_trend;
pub mod ma_cross;
pub mod macd;
pub mod rsi;
pub mod stochastic;
pub mod support_resistance;
pub mod volume;

use thiserror::Error;

use crate::domain::{Bar, SeriesSet, Timeframe};
use crate::signal::IndicatorVote;

pub use bollinger::BollingerVote;
pub use htf_trend::HtfTrendVote;
pub use ma_cross::MaCrossVote;
pub use macd::MacdVote;
pub use rsi::RsiVote;
pub use stochastic::StochasticVote;
pub use support_resistance::SupportResistanceVote;
pub use volume::VolumeVote;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("{indicator}: insufficient history on {timeframe}: need {required} bars, have {available}")]
    InsufficientHistory {
        indicator: &'static str,
        timeframe: &'static str,
        required: usize,
        available: usize,
    },
}

/// One indicator's entry point into the voting battery.
///
/// Implementations hold only their parameters; all state comes in through
/// `evaluate`, which must be a pure function of the series set.
pub trait VoteSource: Send + Sync {
    /// Name matched against the configured weights (e.g. "ma_cross").
    fn name(&self) -> &'static str;

    /// Timeframe this source reads. M5 unless overridden.
    fn timeframe(&self) -> Timeframe {
        Timeframe::M5
    }

    /// Minimum bars of history required on the source's timeframe.
    fn min_bars(&self) -> usize;

    fn evaluate(&self, series: &SeriesSet) -> Result<IndicatorVote, IndicatorError>;
}

/// Fetch the source's bars, or fail with `InsufficientHistory`.
pub(crate) fn history<'a>(
    series: &'a SeriesSet,
    indicator: &'static str,
    timeframe: Timeframe,
    required: usize,
) -> Result<&'a [Bar], IndicatorError> {
    let bars = series.get(timeframe);
    if bars.len() < required {
        return Err(IndicatorError::InsufficientHistory {
            indicator,
            timeframe: timeframe.as_str(),
            required,
            available: bars.len(),
        });
    }
    Ok(bars)
}

/// The full default battery with the documented parameters.
pub fn default_sources() -> Vec<Box<dyn VoteSource>> {
    vec![
        Box::new(MaCrossVote::default_params()),
        Box::new(MacdVote::default_params()),
        Box::new(RsiVote::default_params()),
        Box::new(StochasticVote::default_params()),
        Box::new(BollingerVote::default_params()),
        Box::new(SupportResistanceVote::default_params()),
        Box::new(HtfTrendVote::default_params()),
        Box::new(VolumeVote::default_params()),
    ]
}

#[cfg(test)]
pub(crate) fn m5_series(bars: Vec<Bar>) -> SeriesSet {
    let mut set = SeriesSet::new();
    set.insert(Timeframe::M5, bars);
    set
}

#[cfg(test)]
pub(crate) fn h1_series(bars: Vec<Bar>) -> SeriesSet {
    let mut set = SeriesSet::new();
    set.insert(Timeframe::H1, bars);
    set
}
