//! TradeReplay CLI: single runs, paper replay, and parameter sweeps.
//!
//! Commands:
//! - `run`: replay a bar file (with signals) under a TOML config
//! - `paper`: replay raw candles through an MA-cross signal and the streaming driver
//! - `sweep`: evaluate a grid of exit and risk settings in parallel

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradereplay_core::signals::MaCross;
use tradereplay_core::SimConfig;
use tradereplay_runner::{
    format_metrics, format_summary, load_bars_csv, load_candles_csv, rank, run_single, run_sweep,
    save_artifacts, PaperSession, SweepGrid, SweepOptions,
};

#[derive(Parser)]
#[command(
    name = "tradereplay",
    about = "Bar-by-bar trade execution simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest over a bar file that already carries signals.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// CSV with timestamp,open,high,low,close,signal[,volatility].
        #[arg(long)]
        bars: PathBuf,

        /// Write trades.csv, equity.csv and result.json here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay candles one at a time through an MA-cross signal.
    Paper {
        #[arg(long)]
        config: PathBuf,

        /// CSV with timestamp,open,high,low,close[,volume].
        #[arg(long)]
        bars: PathBuf,

        #[arg(long, default_value_t = 10)]
        fast: usize,

        #[arg(long, default_value_t = 30)]
        slow: usize,

        /// ATR period for volatility readings. Defaults to the config's atr_window.
        #[arg(long)]
        atr_period: Option<usize>,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Evaluate a grid of exit and risk settings.
    Sweep {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        bars: PathBuf,

        /// Stop distances as a fraction of entry (comma separated).
        #[arg(long, value_delimiter = ',')]
        sl: Vec<f64>,

        /// Reward/risk ratios (comma separated).
        #[arg(long, value_delimiter = ',')]
        rr: Vec<f64>,

        /// ATR multipliers for the stop (comma separated).
        #[arg(long, value_delimiter = ',')]
        atr_sl: Vec<f64>,

        /// ATR multipliers for the target (comma separated).
        #[arg(long, value_delimiter = ',')]
        atr_tp: Vec<f64>,

        /// Risk fractions per trade (comma separated). Defaults to the config's.
        #[arg(long, value_delimiter = ',')]
        risk: Vec<f64>,

        #[arg(long)]
        max_combinations: Option<usize>,

        #[arg(long, default_value_t = 0)]
        min_trades: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// How many ranked combinations to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Write every outcome as JSON to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradereplay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, bars, out } => run_cmd(&config, &bars, out.as_deref()),
        Commands::Paper {
            config,
            bars,
            fast,
            slow,
            atr_period,
            out,
        } => paper_cmd(&config, &bars, fast, slow, atr_period, out.as_deref()),
        Commands::Sweep {
            config,
            bars,
            sl,
            rr,
            atr_sl,
            atr_tp,
            risk,
            max_combinations,
            min_trades,
            seed,
            top,
            out,
        } => {
            let grid = SweepGrid {
                sl_pcts: sl,
                tp_rrs: rr,
                atr_mults_sl: atr_sl,
                atr_mults_tp: atr_tp,
                risk_pcts: risk,
            };
            let options = SweepOptions {
                max_combinations,
                min_trades,
                seed,
            };
            sweep_cmd(&config, &bars, &grid, &options, top, out.as_deref())
        }
    }
}

fn load_config(path: &Path) -> Result<SimConfig> {
    SimConfig::from_path(path).with_context(|| format!("load config {}", path.display()))
}

fn run_cmd(config_path: &Path, bars_path: &Path, out: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let bars = load_bars_csv(bars_path)
        .with_context(|| format!("load bars {}", bars_path.display()))?;

    let result = run_single(&config, &bars)?;
    print!("{}", format_summary(&result));

    if let Some(dir) = out {
        let paths = save_artifacts(dir, &result)?;
        info!(dir = %dir.display(), "artifacts written");
        println!("Result written to {}", paths.result_json.display());
    }
    Ok(())
}

fn paper_cmd(
    config_path: &Path,
    bars_path: &Path,
    fast: usize,
    slow: usize,
    atr_period: Option<usize>,
    out: Option<&Path>,
) -> Result<()> {
    if fast == 0 || slow <= fast {
        bail!("need 0 < fast < slow, got fast={fast} slow={slow}");
    }
    let config = load_config(config_path)?;
    let candles = load_candles_csv(bars_path)
        .with_context(|| format!("load candles {}", bars_path.display()))?;

    let mut session = PaperSession::new(&config, Box::new(MaCross::new(fast, slow)), atr_period)?;
    session.replay(candles)?;

    let result = session.result();
    print!("{}", format_summary(&result));
    if let Some(dir) = out {
        save_artifacts(dir, &result)?;
    }
    Ok(())
}

fn sweep_cmd(
    config_path: &Path,
    bars_path: &Path,
    grid: &SweepGrid,
    options: &SweepOptions,
    top: usize,
    out: Option<&Path>,
) -> Result<()> {
    if grid.size() == 0 {
        bail!("empty grid: pass --sl and --rr, or --atr-sl and --atr-tp");
    }
    let config = load_config(config_path)?;
    let bars = load_bars_csv(bars_path)
        .with_context(|| format!("load bars {}", bars_path.display()))?;

    let outcomes = run_sweep(&bars, &config, grid, options);
    let ranked = rank(&outcomes, options.min_trades);

    println!(
        "{} combinations evaluated, {} ranked (min_trades={})",
        outcomes.len(),
        ranked.len(),
        options.min_trades
    );
    for (i, outcome) in ranked.iter().take(top).enumerate() {
        let Some(metrics) = &outcome.metrics else {
            continue;
        };
        println!(
            "\n#{} {} exit={:?} risk={}",
            i + 1,
            outcome.fingerprint.get(..12).unwrap_or(&outcome.fingerprint),
            outcome.config.execution.exit,
            outcome.config.risk.risk_pct
        );
        print!("{}", format_metrics(metrics));
    }

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&outcomes).context("serialize sweep outcomes")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "sweep outcomes written");
    }
    Ok(())
}
