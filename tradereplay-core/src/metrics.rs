//! Performance metrics: pure functions over the equity samples and trade list.

use serde::{Deserialize, Serialize};

use crate::domain::{ClosedTrade, EquitySample};

/// The five summary statistics of a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metrics {
    pub total_return_pct: f64,
    /// Always <= 0.
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    /// NaN when there is no losing trade (including no trades at all).
    /// Written as `null` in JSON.
    #[serde(with = "nan_as_null")]
    pub profit_factor: f64,
    pub trade_count: usize,
}

impl Metrics {
    pub fn compute(equity: &[EquitySample], trades: &[ClosedTrade]) -> Self {
        Self {
            total_return_pct: total_return_pct(equity),
            max_drawdown_pct: max_drawdown_pct(equity),
            win_rate_pct: win_rate_pct(trades),
            profit_factor: profit_factor(trades),
            trade_count: trades.len(),
        }
    }

    /// Field-wise equality that treats two NaN profit factors as equal.
    pub fn same_as(&self, other: &Metrics) -> bool {
        fn eq(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }
        eq(self.total_return_pct, other.total_return_pct)
            && eq(self.max_drawdown_pct, other.max_drawdown_pct)
            && eq(self.win_rate_pct, other.win_rate_pct)
            && eq(self.profit_factor, other.profit_factor)
            && self.trade_count == other.trade_count
    }
}

/// JSON has no NaN: write it as `null` and read `null` back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// (last / first - 1) * 100. Zero without samples.
pub fn total_return_pct(equity: &[EquitySample]) -> f64 {
    let (Some(first), Some(last)) = (equity.first(), equity.last()) else {
        return 0.0;
    };
    if first.capital <= 0.0 {
        return 0.0;
    }
    (last.capital / first.capital - 1.0) * 100.0
}

/// Deepest decline from the running peak, in percent (e.g. -15.0).
pub fn max_drawdown_pct(equity: &[EquitySample]) -> f64 {
    let Some(first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first.capital;
    let mut max_dd = 0.0_f64;

    for sample in equity {
        if sample.capital > peak {
            peak = sample.capital;
        }
        if peak > 0.0 {
            let dd = (sample.capital - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd * 100.0
}

/// Share of trades with positive pnl, in percent.
pub fn win_rate_pct(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64 * 100.0
}

/// Gross profit / gross loss.
///
/// Undefined (NaN) unless at least one trade lost money.
pub fn profit_factor(trades: &[ClosedTrade]) -> f64 {
    if !trades.iter().any(|t| t.is_loser()) {
        return f64::NAN;
    }
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.pnl.abs())
        .sum();
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.is_winner())
        .map(|t| t.pnl)
        .sum();
    gross_profit / gross_loss
}
