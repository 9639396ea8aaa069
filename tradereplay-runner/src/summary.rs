//! Human-readable run summary.

use std::fmt::Write;

use tradereplay_core::{Metrics, RunResult};

/// The five headline metrics as a text block.
pub fn format_metrics(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "===== BACKTEST SUMMARY =====");
    let _ = writeln!(out, "Trades:         {}", metrics.trade_count);
    let _ = writeln!(out, "Total return:   {:.2} %", metrics.total_return_pct);
    let _ = writeln!(out, "Max drawdown:   {:.2} %", metrics.max_drawdown_pct);
    let _ = writeln!(out, "Win rate:       {:.2} %", metrics.win_rate_pct);
    if metrics.profit_factor.is_nan() {
        let _ = writeln!(out, "Profit factor:  n/a");
    } else {
        let _ = writeln!(out, "Profit factor:  {:.2}", metrics.profit_factor);
    }
    out
}

/// Metrics plus final capital and any position left open.
pub fn format_summary(result: &RunResult) -> String {
    let mut out = format_metrics(&result.metrics);
    let _ = writeln!(out, "Final capital:  {:.2}", result.final_capital);
    if let Some(open) = &result.open_position {
        let _ = writeln!(
            out,
            "Open position:  {:?} {:.4} @ {:.4} since {}",
            open.direction,
            open.size,
            open.entry_price,
            open.entry_time.to_rfc3339()
        );
    }
    out
}
