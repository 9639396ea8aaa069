//! Stop and target price derivation.

use chrono::{DateTime, Utc};

use crate::config::ExitModel;
use crate::domain::Direction;
use crate::error::SimError;

/// Stop and target levels for a new position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitLevels {
    pub stop_price: f64,
    pub target_price: f64,
}

/// Compute stop and target for an entry at `entry_price`.
///
/// `volatility` is only read in ATR mode, where it must be present, finite
/// and non-negative. `timestamp` identifies the entry bar in errors.
///
/// Long: stop below entry, target above. Short: mirrored.
pub fn compute_exit_prices(
    model: &ExitModel,
    direction: Direction,
    entry_price: f64,
    volatility: Option<f64>,
    timestamp: DateTime<Utc>,
) -> Result<ExitLevels, SimError> {
    model.validate()?;

    let (stop_distance, target_distance) = match *model {
        ExitModel::AtrBased {
            atr_mult_sl,
            atr_mult_tp,
        } => {
            let atr = volatility
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or(SimError::MissingVolatilityData { timestamp })?;
            (atr * atr_mult_sl, atr * atr_mult_tp)
        }
        ExitModel::FixedPercent { sl_pct, tp_rr } => {
            (entry_price * sl_pct, entry_price * sl_pct * tp_rr)
        }
    };

    let levels = match direction {
        Direction::Long => ExitLevels {
            stop_price: entry_price - stop_distance,
            target_price: entry_price + target_distance,
        },
        Direction::Short => ExitLevels {
            stop_price: entry_price + stop_distance,
            target_price: entry_price - target_distance,
        },
    };
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    const FIXED: ExitModel = ExitModel::FixedPercent {
        sl_pct: 0.01,
        tp_rr: 2.0,
    };

    const ATR: ExitModel = ExitModel::AtrBased {
        atr_mult_sl: 1.5,
        atr_mult_tp: 3.0,
    };

    #[test]
    fn fixed_percent_long() {
        let levels = compute_exit_prices(&FIXED, Direction::Long, 100.0, None, ts()).unwrap();
        assert!((levels.stop_price - 99.0).abs() < 1e-10);
        assert!((levels.target_price - 102.0).abs() < 1e-10);
    }

    #[test]
    fn fixed_percent_short_is_mirrored() {
        let levels = compute_exit_prices(&FIXED, Direction::Short, 100.0, None, ts()).unwrap();
        assert!((levels.stop_price - 101.0).abs() < 1e-10);
        assert!((levels.target_price - 98.0).abs() < 1e-10);
    }

    #[test]
    fn fixed_percent_ignores_volatility() {
        let with = compute_exit_prices(&FIXED, Direction::Long, 100.0, Some(5.0), ts()).unwrap();
        let without = compute_exit_prices(&FIXED, Direction::Long, 100.0, None, ts()).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn atr_long_and_short() {
        let long = compute_exit_prices(&ATR, Direction::Long, 100.0, Some(2.0), ts()).unwrap();
        assert_eq!(long.stop_price, 97.0);
        assert_eq!(long.target_price, 106.0);

        let short = compute_exit_prices(&ATR, Direction::Short, 100.0, Some(2.0), ts()).unwrap();
        assert_eq!(short.stop_price, 103.0);
        assert_eq!(short.target_price, 94.0);
    }

    #[test]
    fn atr_without_reading_fails() {
        let err = compute_exit_prices(&ATR, Direction::Long, 100.0, None, ts()).unwrap_err();
        assert_eq!(err, SimError::MissingVolatilityData { timestamp: ts() });

        let err =
            compute_exit_prices(&ATR, Direction::Long, 100.0, Some(f64::NAN), ts()).unwrap_err();
        assert!(matches!(err, SimError::MissingVolatilityData { .. }));

        let err = compute_exit_prices(&ATR, Direction::Long, 100.0, Some(-1.0), ts()).unwrap_err();
        assert!(matches!(err, SimError::MissingVolatilityData { .. }));
    }

    #[test]
    fn degenerate_model_is_invalid_config() {
        let model = ExitModel::FixedPercent {
            sl_pct: f64::NAN,
            tp_rr: 2.0,
        };
        let err = compute_exit_prices(&model, Direction::Long, 100.0, None, ts()).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }
}
