//! Simulation engine: one state machine, two drivers.
//!
//! [`TradeSimulator`] owns the per-bar transition. [`BatchDriver`] replays a
//! complete table; [`StreamingDriver`] accepts bars one at a time. Both call
//! the same transition, so their results for the same input are identical.

pub mod batch;
pub mod simulator;
pub mod streaming;

pub use batch::{run_backtest, BatchDriver};
pub use simulator::{BarEvents, SimState, TradeSimulator};
pub use streaming::StreamingDriver;
