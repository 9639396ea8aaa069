//! RunResult: the trade history, equity samples and summary of a run.

use serde::{Deserialize, Serialize};

use crate::domain::{ClosedTrade, EquitySample, OpenPosition};
use crate::metrics::Metrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub trades: Vec<ClosedTrade>,
    pub equity: Vec<EquitySample>,
    pub metrics: Metrics,
    /// Position still open when the run ended. Never force-closed.
    pub open_position: Option<OpenPosition>,
    pub final_capital: f64,
}

impl RunResult {
    pub fn new(
        trades: Vec<ClosedTrade>,
        equity: Vec<EquitySample>,
        open_position: Option<OpenPosition>,
        final_capital: f64,
    ) -> Self {
        let metrics = Metrics::compute(&equity, &trades);
        Self {
            trades,
            equity,
            metrics,
            open_position,
            final_capital,
        }
    }

    /// Recompute the summary from the stored trades and equity samples.
    pub fn recompute_metrics(&self) -> Metrics {
        Metrics::compute(&self.equity, &self.trades)
    }
}
