//! Moving average crossover.
//!
//! - Long on the bar where the fast SMA crosses above the slow SMA
//! - Short on the bar where it crosses below
//! - Flat otherwise

use crate::domain::{Candle, Signal};
use crate::signals::SignalSource;

#[derive(Debug, Clone)]
pub struct MaCross {
    fast_period: usize,
    slow_period: usize,
}

impl MaCross {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        assert!(fast_period > 0, "fast_period must be > 0");
        assert!(slow_period > fast_period, "slow_period must be > fast_period");
        Self {
            fast_period,
            slow_period,
        }
    }

    fn sma(candles: &[Candle], period: usize) -> Option<f64> {
        if candles.len() < period {
            return None;
        }
        let recent = &candles[candles.len() - period..];
        Some(recent.iter().map(|c| c.close).sum::<f64>() / period as f64)
    }
}

impl SignalSource for MaCross {
    fn produce_signal(&self, window: &[Candle]) -> Signal {
        if window.len() < self.slow_period + 1 {
            return Signal::Flat;
        }
        let prev = &window[..window.len() - 1];
        let (Some(fast_now), Some(slow_now), Some(fast_prev), Some(slow_prev)) = (
            Self::sma(window, self.fast_period),
            Self::sma(window, self.slow_period),
            Self::sma(prev, self.fast_period),
            Self::sma(prev, self.slow_period),
        ) else {
            return Signal::Flat;
        };

        if fast_prev <= slow_prev && fast_now > slow_now {
            Signal::Long
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            Signal::Short
        } else {
            Signal::Flat
        }
    }

    fn name(&self) -> &str {
        "ma_cross"
    }

    fn lookback(&self) -> usize {
        self.slow_period + 1
    }
}
