//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with
//! TR[0] = high-low. ATR is seeded with the mean of the first `period` true
//! ranges and then Wilder-smoothed: atr = (prev * (period-1) + tr) / period.
//! Readings before the seed are absent.

use crate::domain::Candle;

/// True range of `candle` given the previous close, if any.
pub fn true_range(candle: &Candle, prev_close: Option<f64>) -> f64 {
    let high_low = candle.high - candle.low;
    match prev_close {
        Some(pc) => high_low
            .max((candle.high - pc).abs())
            .max((candle.low - pc).abs()),
        None => high_low,
    }
}

/// Incremental ATR, one candle at a time.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    seed_sum: f64,
    seen: usize,
    value: Option<f64>,
}

impl Atr {
    /// # Panics
    ///
    /// If `period` is zero.
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            prev_close: None,
            seed_sum: 0.0,
            seen: 0,
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Consume a candle and return the reading for it, if warmed up.
    pub fn update(&mut self, candle: &Candle) -> Option<f64> {
        if !(candle.high.is_finite() && candle.low.is_finite() && candle.close.is_finite()) {
            // A void candle breaks the smoothing chain; start over.
            self.prev_close = None;
            self.seed_sum = 0.0;
            self.seen = 0;
            self.value = None;
            return None;
        }
        let tr = true_range(candle, self.prev_close);
        self.prev_close = Some(candle.close);

        self.seen += 1;
        self.value = match self.value {
            Some(prev) => {
                let n = self.period as f64;
                Some((prev * (n - 1.0) + tr) / n)
            }
            None => {
                self.seed_sum += tr;
                if self.seen == self.period {
                    Some(self.seed_sum / self.period as f64)
                } else {
                    None
                }
            }
        };
        self.value
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// ATR reading for every candle in `candles`. Panics if `period` is zero.
pub fn atr_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut atr = Atr::new(period);
    candles.iter().map(|c| atr.update(c)).collect()
}
