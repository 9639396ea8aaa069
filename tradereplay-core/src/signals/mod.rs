//! Signal sources: the strategy side of the simulator's input.
//!
//! A source looks only at market data, never at capital or positions, and
//! must be deterministic for the same candle window.

pub mod ma_cross;

pub use ma_cross::MaCross;

use crate::domain::{Bar, Candle, Signal};
use crate::error::SimError;
use crate::indicators::Atr;

pub trait SignalSource: Send + Sync {
    /// Signal for the last candle of `window` (the window includes it).
    fn produce_signal(&self, window: &[Candle]) -> Signal;

    /// Source name for logs and reports.
    fn name(&self) -> &str;

    /// How many of the most recent candles `produce_signal` reads. Callers
    /// may drop anything older; at least the current candle is always kept.
    fn lookback(&self) -> usize {
        1
    }
}

/// Length of the window handed to `source` for a history of `available` candles.
pub fn window_len(source: &dyn SignalSource, available: usize) -> usize {
    source.lookback().max(1).min(available)
}

/// Build simulator bars from candles: one signal per candle from `source`,
/// and an ATR reading when `atr_period` is set.
///
/// Fails with `InvalidConfig` when `atr_period` is `Some(0)`.
pub fn annotate(
    candles: &[Candle],
    source: &dyn SignalSource,
    atr_period: Option<usize>,
) -> Result<Vec<Bar>, SimError> {
    if atr_period == Some(0) {
        return Err(SimError::InvalidConfig("atr period must be >= 1".into()));
    }
    let mut atr = atr_period.map(Atr::new);
    let bars = candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let seen = &candles[..=i];
            let window = &seen[seen.len() - window_len(source, seen.len())..];
            let signal = source.produce_signal(window);
            let volatility = atr.as_mut().and_then(|a| a.update(candle));
            Bar::from_candle(candle, signal, volatility)
        })
        .collect();
    Ok(bars)
}
