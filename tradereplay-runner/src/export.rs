//! Run artifacts: trade tape CSV, equity CSV, full result JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tradereplay_core::{ClosedTrade, EquitySample, RunResult};

/// Paths written by [`save_artifacts`].
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub trades_csv: PathBuf,
    pub equity_csv: PathBuf,
    pub result_json: PathBuf,
}

/// Render the closed trades as CSV, one row per round trip.
pub fn trades_to_csv(trades: &[ClosedTrade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record([
        "entry_time",
        "exit_time",
        "direction",
        "entry_price",
        "exit_price",
        "size",
        "stop_price",
        "target_price",
        "exit_reason",
        "gross_pnl",
        "entry_fee",
        "exit_fee",
        "pnl",
        "pnl_pct",
    ])?;

    for t in trades {
        wtr.write_record(&[
            t.entry_time.to_rfc3339(),
            t.exit_time.to_rfc3339(),
            format!("{:?}", t.direction).to_lowercase(),
            format!("{:.6}", t.entry_price),
            format!("{:.6}", t.exit_price),
            format!("{:.6}", t.size),
            format!("{:.6}", t.stop_price),
            format!("{:.6}", t.target_price),
            format!("{:?}", t.exit_reason).to_lowercase(),
            format!("{:.6}", t.gross_pnl),
            format!("{:.6}", t.entry_fee),
            format!("{:.6}", t.exit_fee),
            format!("{:.6}", t.pnl),
            format!("{:.6}", t.pnl_pct),
        ])?;
    }

    let data = wtr.into_inner().context("flush trades CSV")?;
    String::from_utf8(data).context("trades CSV is not UTF-8")
}

/// Render the equity samples as `timestamp,capital` CSV.
pub fn equity_to_csv(equity: &[EquitySample]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["timestamp", "capital"])?;
    for s in equity {
        wtr.write_record(&[s.timestamp.to_rfc3339(), format!("{:.6}", s.capital)])?;
    }
    let data = wtr.into_inner().context("flush equity CSV")?;
    String::from_utf8(data).context("equity CSV is not UTF-8")
}

pub fn result_to_json(result: &RunResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("serialize run result")
}

/// Write all artifacts of a run into `dir`, creating it if needed.
pub fn save_artifacts(dir: &Path, result: &RunResult) -> Result<ArtifactPaths> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))?;

    let paths = ArtifactPaths {
        trades_csv: dir.join("trades.csv"),
        equity_csv: dir.join("equity.csv"),
        result_json: dir.join("result.json"),
    };

    fs::write(&paths.trades_csv, trades_to_csv(&result.trades)?)
        .with_context(|| format!("write {}", paths.trades_csv.display()))?;
    fs::write(&paths.equity_csv, equity_to_csv(&result.equity)?)
        .with_context(|| format!("write {}", paths.equity_csv.display()))?;
    fs::write(&paths.result_json, result_to_json(result)?)
        .with_context(|| format!("write {}", paths.result_json.display()))?;

    Ok(paths)
}
