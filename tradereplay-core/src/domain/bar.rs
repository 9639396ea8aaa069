//! Bar: one unit of market data plus the strategy's reading for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Directional signal emitted by a strategy for a single bar.
///
/// Serialized as the integer `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Signal {
    Short,
    #[default]
    Flat,
    Long,
}

impl Signal {
    pub fn is_flat(&self) -> bool {
        matches!(self, Signal::Flat)
    }

    pub fn as_i8(&self) -> i8 {
        match self {
            Signal::Short => -1,
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = SimError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Short),
            0 => Ok(Signal::Flat),
            1 => Ok(Signal::Long),
            other => Err(SimError::InvalidInput(format!(
                "signal must be -1, 0 or 1, got {other}"
            ))),
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

/// Raw OHLCV candle as produced by a data feed, before any signal is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }
}

/// Input bar for the simulator: OHLC, the strategy signal and an optional
/// volatility reading (ATR) for the same timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub signal: Signal,
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            signal: Signal::Flat,
            volatility: None,
        }
    }

    pub fn from_candle(candle: &Candle, signal: Signal, volatility: Option<f64>) -> Self {
        Self {
            timestamp: candle.timestamp,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            signal,
            volatility,
        }
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, low <= open/close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }

    /// Check the bar's own fields, and that it comes strictly after `prev`.
    pub fn validate(&self, prev: Option<DateTime<Utc>>) -> Result<(), SimError> {
        if !self.is_sane() {
            return Err(SimError::InvalidInput(format!(
                "malformed bar at {}: open={} high={} low={} close={}",
                self.timestamp, self.open, self.high, self.low, self.close
            )));
        }
        if let Some(prev) = prev {
            if self.timestamp <= prev {
                return Err(SimError::InvalidInput(format!(
                    "timestamps must be strictly increasing: {} follows {}",
                    self.timestamp, prev
                )));
            }
        }
        Ok(())
    }
}

/// Validate a whole sequence before any bar is processed.
///
/// `after` is the timestamp of the last bar already consumed, if any.
pub fn validate_sequence(bars: &[Bar], after: Option<DateTime<Utc>>) -> Result<(), SimError> {
    let mut prev = after;
    for bar in bars {
        bar.validate(prev)?;
        prev = Some(bar.timestamp);
    }
    Ok(())
}
