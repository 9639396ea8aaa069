//! TradeReplay Runner: file-level harness around `tradereplay-core`.
//!
//! This crate builds on `tradereplay-core` to provide:
//! - CSV bar and candle loading
//! - Single-run orchestration from config and bar files
//! - Trade, equity and result export
//! - Text summaries
//! - Paper replay through a signal source and the streaming driver
//! - Parallel parameter sweeps with seeded subsampling and ranking

pub mod data_loader;
pub mod export;
pub mod paper;
pub mod runner;
pub mod summary;
pub mod sweep;

pub use data_loader::{load_bars_csv, load_candles_csv, read_bars, read_candles, LoadError};
pub use export::{save_artifacts, ArtifactPaths};
pub use paper::PaperSession;
pub use runner::{run_from_paths, run_single, RunError};
pub use summary::{format_metrics, format_summary};
pub use sweep::{rank, run_sweep, SweepGrid, SweepOptions, SweepOutcome};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn sweep_types_are_send_sync() {
        assert_send::<SweepOutcome>();
        assert_sync::<SweepOutcome>();
        assert_send::<SweepGrid>();
        assert_sync::<SweepGrid>();
    }

    #[test]
    fn paper_session_is_send() {
        assert_send::<PaperSession>();
    }
}
