//! Errors raised by the simulator.
//!
//! Every variant is fatal to the run that produced it. Sizing to zero is not
//! an error: the entry is skipped and the run continues.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Exit model under-specified, or a config value out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// ATR-based exits were requested but the entry bar has no usable reading.
    #[error("missing volatility reading on entry bar at {timestamp}")]
    MissingVolatilityData { timestamp: DateTime<Utc> },

    /// Malformed bar or out-of-order timestamps.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
