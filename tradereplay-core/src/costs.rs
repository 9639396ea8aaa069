//! Transaction costs: fees, slippage and spread.
//!
//! - Fee: `price * size * fee_pct`, charged at entry and at exit.
//! - Slippage: fill price shifted against the holder by `slippage_pct`,
//!   at entry and at exit.
//! - Spread: half of `spread_pct` paid against the holder at entry only.
//!
//! All adjustments are deterministic functions of price, size and config.

use crate::config::ExecutionConfig;
use crate::domain::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub fee_pct: f64,
    pub slippage_pct: f64,
    pub spread_pct: f64,
}

impl CostModel {
    pub fn new(fee_pct: f64, slippage_pct: f64, spread_pct: f64) -> Self {
        Self {
            fee_pct,
            slippage_pct,
            spread_pct,
        }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.fee_pct, config.slippage_pct, config.spread_pct)
    }

    /// Effective entry fill for a reference price (half spread, then slippage).
    pub fn entry_price(&self, direction: Direction, reference: f64) -> f64 {
        let mut price = reference;
        if self.spread_pct > 0.0 {
            price *= 1.0 + direction.sign() * self.spread_pct / 2.0;
        }
        if self.slippage_pct > 0.0 {
            price *= 1.0 + direction.sign() * self.slippage_pct;
        }
        price
    }

    /// Effective exit fill for a triggered stop or target level.
    ///
    /// Closing a long sells, so slippage lowers the price; closing a short
    /// buys, so it raises it.
    pub fn exit_price(&self, direction: Direction, level: f64) -> f64 {
        if self.slippage_pct > 0.0 {
            level * (1.0 - direction.sign() * self.slippage_pct)
        } else {
            level
        }
    }

    /// Fee on a fill, always a debit.
    pub fn fee(&self, price: f64, size: f64) -> f64 {
        (price * size * self.fee_pct).abs()
    }
}
