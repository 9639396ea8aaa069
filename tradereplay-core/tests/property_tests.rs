//! Property tests for simulator invariants.
//!
//! Uses proptest to verify:
//! 1. Sizing risks exactly risk_pct of capital
//! 2. Exit levels sit on the correct side of entry
//! 3. One equity sample per bar, and drawdown never positive
//! 4. Profit factor is NaN exactly when no trade lost money
//! 5. At most one position at a time (trades never overlap)
//! 6. Batch and streaming drivers agree

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use tradereplay_core::{
    compute_exit_prices, position_size, run_backtest, Bar, Direction, ExecutionConfig, ExitModel,
    RiskConfig, Signal, StreamingDriver,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Long), Just(Direction::Short)]
}

fn arb_exit_model() -> impl Strategy<Value = ExitModel> {
    prop_oneof![
        (0.001..0.2_f64, 0.5..5.0_f64)
            .prop_map(|(sl_pct, tp_rr)| ExitModel::FixedPercent { sl_pct, tp_rr }),
        (0.1..4.0_f64, 0.1..8.0_f64).prop_map(|(atr_mult_sl, atr_mult_tp)| {
            ExitModel::AtrBased {
                atr_mult_sl,
                atr_mult_tp,
            }
        }),
    ]
}

/// Random walk bars with random signals and a volatility reading on each.
fn arb_bars() -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((-2.0..2.0_f64, 0.1..3.0_f64, -1i8..=1), 1..200).prop_map(|steps| {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut prev_close = 100.0_f64;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (step, range, signal))| {
                let open = prev_close;
                let close = (prev_close + step).max(1.0);
                let high = open.max(close) + range / 2.0;
                let low = (open.min(close) - range / 2.0).max(0.01);
                prev_close = close;
                Bar::new(t0 + Duration::minutes(i as i64), open, high, low, close)
                    .with_signal(Signal::try_from(signal).unwrap())
                    .with_volatility(range)
            })
            .collect()
    })
}

fn arb_config() -> impl Strategy<Value = ExecutionConfig> {
    (arb_exit_model(), 0.0..0.005_f64, any::<bool>()).prop_map(|(exit, fee_pct, allow_short)| {
        ExecutionConfig {
            initial_capital: 1000.0,
            fee_pct,
            exit,
            allow_short,
            slippage_pct: 0.0,
            spread_pct: 0.0,
        }
    })
}

// ── 1. Sizing ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn size_risks_exact_fraction(
        capital in 100.0..1_000_000.0_f64,
        entry in arb_price(),
        offset in 0.01..5.0_f64,
        risk_pct in 0.001..0.1_f64,
    ) {
        let stop = entry - offset;
        let size = position_size(capital, entry, stop, risk_pct);
        let risked = size * (entry - stop).abs();
        prop_assert!((risked - capital * risk_pct).abs() < 1e-6 * capital);
    }

    #[test]
    fn no_size_without_capital_or_distance(entry in arb_price(), risk_pct in 0.001..0.1_f64) {
        prop_assert_eq!(position_size(0.0, entry, entry - 1.0, risk_pct), 0.0);
        prop_assert_eq!(position_size(1000.0, entry, entry, risk_pct), 0.0);
    }
}

// ── 2. Exit levels ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn levels_bracket_entry(
        model in arb_exit_model(),
        direction in arb_direction(),
        entry in arb_price(),
        vol in 0.01..5.0_f64,
    ) {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let levels = compute_exit_prices(&model, direction, entry, Some(vol), ts).unwrap();
        match direction {
            Direction::Long => {
                prop_assert!(levels.stop_price < entry);
                prop_assert!(levels.target_price > entry);
            }
            Direction::Short => {
                prop_assert!(levels.stop_price > entry);
                prop_assert!(levels.target_price < entry);
            }
        }
    }
}

// ── 3-5. Run invariants ──────────────────────────────────────────────

proptest! {
    #[test]
    fn run_invariants_hold(bars in arb_bars(), config in arb_config()) {
        let result = run_backtest(&bars, &config, &RiskConfig::default()).unwrap();

        prop_assert_eq!(result.equity.len(), bars.len());
        prop_assert!(result.metrics.max_drawdown_pct <= 0.0);

        let has_loser = result.trades.iter().any(|t| t.pnl < 0.0);
        prop_assert_eq!(result.metrics.profit_factor.is_nan(), !has_loser);

        for trade in &result.trades {
            prop_assert!(trade.exit_time > trade.entry_time);
            prop_assert!(trade.size > 0.0);
            if !config.allow_short {
                prop_assert_eq!(trade.direction, Direction::Long);
            }
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[1].entry_time >= pair[0].exit_time);
        }
        if let (Some(open), Some(last)) = (&result.open_position, result.trades.last()) {
            prop_assert!(open.entry_time >= last.exit_time);
        }
    }

    #[test]
    fn streaming_agrees_with_batch(bars in arb_bars(), config in arb_config()) {
        let batch = run_backtest(&bars, &config, &RiskConfig::default()).unwrap();
        let mut stream = StreamingDriver::new(config, RiskConfig::default()).unwrap();
        for bar in &bars {
            stream.push(bar).unwrap();
        }
        let streamed = stream.current_result();
        prop_assert_eq!(&batch.trades, &streamed.trades);
        prop_assert_eq!(&batch.equity, &streamed.equity);
        prop_assert!(batch.metrics.same_as(&streamed.metrics));
    }
}
