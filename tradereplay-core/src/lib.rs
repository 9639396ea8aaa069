//! TradeReplay Core: bar-by-bar trade execution simulation.
//!
//! This crate contains the simulator and everything it depends on:
//! - Domain types (bars, signals, positions, closed trades, equity samples)
//! - Exit price calculation (fixed percent or volatility multiples)
//! - Risk-based position sizing and the fee/slippage/spread cost model
//! - The FLAT/OPEN trade state machine with batch and streaming drivers
//! - Run metrics (return, drawdown, win rate, profit factor)
//! - ATR volatility readings and the signal source trait

pub mod config;
pub mod costs;
pub mod domain;
pub mod engine;
pub mod error;
pub mod exits;
pub mod indicators;
pub mod metrics;
pub mod result;
pub mod signals;
pub mod sizing;

pub use config::{ExecutionConfig, ExecutionSettings, ExitModel, RiskConfig, SimConfig};
pub use costs::CostModel;
pub use domain::{Bar, Candle, ClosedTrade, Direction, EquitySample, ExitReason, OpenPosition, Signal};
pub use engine::{run_backtest, BarEvents, BatchDriver, SimState, StreamingDriver, TradeSimulator};
pub use error::SimError;
pub use exits::{compute_exit_prices, ExitLevels};
pub use metrics::Metrics;
pub use result::RunResult;
pub use signals::SignalSource;
pub use sizing::{position_size, PositionSizer};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed to sweep workers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<Candle>();
        require_sync::<Candle>();
        require_send::<ClosedTrade>();
        require_sync::<ClosedTrade>();
        require_send::<OpenPosition>();
        require_sync::<OpenPosition>();

        require_send::<SimConfig>();
        require_sync::<SimConfig>();
        require_send::<ExecutionConfig>();
        require_sync::<ExecutionConfig>();

        require_send::<TradeSimulator>();
        require_sync::<TradeSimulator>();
        require_send::<StreamingDriver>();
        require_sync::<StreamingDriver>();
        require_send::<RunResult>();
        require_sync::<RunResult>();
        require_send::<SimError>();
        require_sync::<SimError>();

        require_send::<Box<dyn SignalSource>>();
        require_sync::<Box<dyn SignalSource>>();
    }
}
