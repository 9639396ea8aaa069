//! Fixed fractional-risk position sizing.
//!
//! ```text
//! risk_amount   = capital * risk_pct
//! risk_per_unit = |entry_price - stop_price|
//! size          = risk_amount / risk_per_unit
//! ```
//!
//! A zero size means "skip this entry". It is never an error.

use crate::config::RiskConfig;

/// Units to trade so that hitting the stop loses `risk_pct` of `capital`.
///
/// Returns 0.0 when capital is not positive or the stop sits on the entry.
pub fn position_size(capital: f64, entry_price: f64, stop_price: f64, risk_pct: f64) -> f64 {
    if capital <= 0.0 {
        return 0.0;
    }
    let risk_per_unit = (entry_price - stop_price).abs();
    if risk_per_unit <= 0.0 {
        return 0.0;
    }
    let size = capital * risk_pct / risk_per_unit;
    if size.is_finite() && size > 0.0 {
        size
    } else {
        0.0
    }
}

/// Position sizer bound to a risk configuration.
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    risk_pct: f64,
}

impl PositionSizer {
    pub fn new(risk: &RiskConfig) -> Self {
        Self {
            risk_pct: risk.risk_pct,
        }
    }

    pub fn size(&self, capital: f64, entry_price: f64, stop_price: f64) -> f64 {
        position_size(capital, entry_price, stop_price, self.risk_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_percent_of_thousand_over_one_dollar_stop() {
        // risk_amount = 10, risk_per_unit = 1
        assert_eq!(position_size(1000.0, 100.0, 99.0, 0.01), 10.0);
    }

    #[test]
    fn short_stop_above_entry_sizes_the_same() {
        assert_eq!(position_size(1000.0, 100.0, 101.0, 0.01), 10.0);
    }

    #[test]
    fn zero_capital_returns_zero() {
        assert_eq!(position_size(0.0, 100.0, 99.0, 0.01), 0.0);
        assert_eq!(position_size(-5.0, 100.0, 99.0, 0.01), 0.0);
    }

    #[test]
    fn stop_on_entry_returns_zero() {
        assert_eq!(position_size(1000.0, 100.0, 100.0, 0.01), 0.0);
    }

    #[test]
    fn sizer_uses_configured_risk() {
        let sizer = PositionSizer::new(&RiskConfig { risk_pct: 0.02 });
        assert_eq!(sizer.size(1000.0, 50.0, 48.0), 10.0);
    }
}
