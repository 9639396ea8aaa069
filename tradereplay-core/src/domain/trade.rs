//! ClosedTrade: a completed round trip, immutable once recorded.

use super::position::{Direction, OpenPosition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    Stop,
    Target,
}

/// A complete round-trip trade record: entry → exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    // ── Entry ──
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub size: f64,
    pub stop_price: f64,
    pub target_price: f64,

    // ── Exit ──
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── PnL ──
    pub gross_pnl: f64,
    pub entry_fee: f64,
    pub exit_fee: f64,
    /// Round-trip net: gross minus both fees.
    pub pnl: f64,
    /// `pnl` as a percentage of the run's initial capital.
    pub pnl_pct: f64,
}

impl ClosedTrade {
    /// Close `position` at `exit_price` (already adjusted for slippage).
    pub fn close(
        position: OpenPosition,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        exit_reason: ExitReason,
        exit_fee: f64,
        initial_capital: f64,
    ) -> Self {
        let gross_pnl = position.gross_pnl(exit_price);
        let pnl = gross_pnl - position.entry_fee - exit_fee;
        let pnl_pct = if initial_capital > 0.0 {
            pnl / initial_capital * 100.0
        } else {
            0.0
        };
        Self {
            direction: position.direction,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            size: position.size,
            stop_price: position.stop_price,
            target_price: position.target_price,
            exit_time,
            exit_price,
            exit_reason,
            gross_pnl,
            entry_fee: position.entry_fee,
            exit_fee,
            pnl,
            pnl_pct,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < 0.0
    }
}
