//! Domain types for the trade simulator.

pub mod bar;
pub mod equity;
pub mod position;
pub mod trade;

pub use bar::{Bar, Candle, Signal};
pub use equity::EquitySample;
pub use position::{Direction, OpenPosition};
pub use trade::{ClosedTrade, ExitReason};
