//! Batch driver: replay a whole historical table in one call.

use tracing::info;

use crate::config::{ExecutionConfig, RiskConfig, SimConfig};
use crate::domain::Bar;
use crate::engine::simulator::TradeSimulator;
use crate::error::SimError;
use crate::result::RunResult;

/// Replays complete bar sequences. Each call to [`BatchDriver::run`] starts
/// from a fresh simulator, so one driver can be reused across datasets.
#[derive(Debug, Clone)]
pub struct BatchDriver {
    execution: ExecutionConfig,
    risk: RiskConfig,
}

impl BatchDriver {
    pub fn new(execution: ExecutionConfig, risk: RiskConfig) -> Result<Self, SimError> {
        execution.validate()?;
        risk.validate()?;
        Ok(Self { execution, risk })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        Self::new(config.execution.clone(), config.risk)
    }

    /// Run the full sequence. Malformed input fails before any bar is processed;
    /// a missing volatility reading aborts the run.
    pub fn run(&self, bars: &[Bar]) -> Result<RunResult, SimError> {
        let mut sim = TradeSimulator::new(self.execution.clone(), self.risk)?;
        sim.replay(bars)?;
        let result = sim.into_result();
        info!(
            bars = bars.len(),
            trades = result.metrics.trade_count,
            total_return_pct = result.metrics.total_return_pct,
            "batch run complete"
        );
        Ok(result)
    }
}

/// Convenience wrapper around [`BatchDriver`].
pub fn run_backtest(
    bars: &[Bar],
    execution: &ExecutionConfig,
    risk: &RiskConfig,
) -> Result<RunResult, SimError> {
    BatchDriver::new(execution.clone(), *risk)?.run(bars)
}
