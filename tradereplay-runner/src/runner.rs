//! Single-run orchestration: config file + bar file in, `RunResult` out.

use std::path::Path;

use thiserror::Error;
use tracing::info;
use tradereplay_core::{Bar, BatchDriver, RunResult, SimConfig, SimError};

use crate::data_loader::{load_bars_csv, LoadError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Run one backtest over bars already in memory.
pub fn run_single(config: &SimConfig, bars: &[Bar]) -> Result<RunResult, RunError> {
    let driver = BatchDriver::from_config(config)?;
    Ok(driver.run(bars)?)
}

/// Load the config and the bar table from disk, then run.
pub fn run_from_paths(config_path: &Path, bars_path: &Path) -> Result<RunResult, RunError> {
    let config = SimConfig::from_path(config_path)?;
    let bars = load_bars_csv(bars_path)?;
    info!(
        config = %config_path.display(),
        bars = bars.len(),
        fingerprint = %config.fingerprint(),
        "starting run"
    );
    run_single(&config, &bars)
}
