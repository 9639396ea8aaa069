//! Parameter sweep over exit and risk settings.
//!
//! Every combination is an independent batch run against the same
//! read-only bar table, so the grid is evaluated in parallel with rayon.
//! Large grids are cut down with a seeded random subsample, and each
//! combination is labelled with its config fingerprint.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use tradereplay_core::{Bar, BatchDriver, ExitModel, Metrics, RiskConfig, SimConfig};

/// Exit and risk values to combine.
///
/// Fixed-percent grids combine `sl_pcts × tp_rrs`; ATR grids combine
/// `atr_mults_sl × atr_mults_tp`. Either kind is crossed with `risk_pcts`.
#[derive(Debug, Clone, Default)]
pub struct SweepGrid {
    pub sl_pcts: Vec<f64>,
    pub tp_rrs: Vec<f64>,
    pub atr_mults_sl: Vec<f64>,
    pub atr_mults_tp: Vec<f64>,
    /// Empty means "keep the base config's risk".
    pub risk_pcts: Vec<f64>,
}

impl SweepGrid {
    pub fn fixed_percent(sl_pcts: Vec<f64>, tp_rrs: Vec<f64>) -> Self {
        Self {
            sl_pcts,
            tp_rrs,
            ..Self::default()
        }
    }

    pub fn atr(atr_mults_sl: Vec<f64>, atr_mults_tp: Vec<f64>) -> Self {
        Self {
            atr_mults_sl,
            atr_mults_tp,
            ..Self::default()
        }
    }

    pub fn with_risk(mut self, risk_pcts: Vec<f64>) -> Self {
        self.risk_pcts = risk_pcts;
        self
    }

    fn exit_models(&self) -> Vec<ExitModel> {
        let mut models = Vec::new();
        for &sl_pct in &self.sl_pcts {
            for &tp_rr in &self.tp_rrs {
                models.push(ExitModel::FixedPercent { sl_pct, tp_rr });
            }
        }
        for &atr_mult_sl in &self.atr_mults_sl {
            for &atr_mult_tp in &self.atr_mults_tp {
                models.push(ExitModel::AtrBased {
                    atr_mult_sl,
                    atr_mult_tp,
                });
            }
        }
        models
    }

    /// Returns the total number of combinations in this grid.
    pub fn size(&self) -> usize {
        let exits = self.sl_pcts.len() * self.tp_rrs.len()
            + self.atr_mults_sl.len() * self.atr_mults_tp.len();
        exits * self.risk_pcts.len().max(1)
    }

    /// Expand the grid into full run configurations derived from `base`.
    pub fn configs(&self, base: &SimConfig) -> Vec<SimConfig> {
        let risks: Vec<RiskConfig> = if self.risk_pcts.is_empty() {
            vec![base.risk]
        } else {
            self.risk_pcts
                .iter()
                .map(|&risk_pct| RiskConfig { risk_pct })
                .collect()
        };

        let mut configs = Vec::with_capacity(self.size());
        for exit in self.exit_models() {
            for risk in &risks {
                let mut config = base.clone();
                config.execution.exit = exit;
                config.risk = *risk;
                configs.push(config);
            }
        }
        configs
    }
}

#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Evaluate at most this many combinations (seeded random subsample).
    pub max_combinations: Option<usize>,
    /// Drop runs with fewer closed trades than this from the ranking.
    pub min_trades: usize,
    pub seed: u64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            max_combinations: None,
            min_trades: 0,
            seed: 42,
        }
    }
}

/// Outcome of one combination. A failed run has no metrics and carries the
/// error message instead.
#[derive(Debug, Clone, Serialize)]
pub struct SweepOutcome {
    pub fingerprint: String,
    pub config: SimConfig,
    pub metrics: Option<Metrics>,
    pub error: Option<String>,
}

impl SweepOutcome {
    pub fn is_ok(&self) -> bool {
        self.metrics.is_some()
    }
}

/// Pick the combinations to evaluate. Deterministic for a given seed.
pub fn select_combinations(
    mut configs: Vec<SimConfig>,
    max_combinations: Option<usize>,
    seed: u64,
) -> Vec<SimConfig> {
    match max_combinations {
        Some(max) if configs.len() > max => {
            let mut rng = StdRng::seed_from_u64(seed);
            configs.shuffle(&mut rng);
            configs.truncate(max);
            configs
        }
        _ => configs,
    }
}

fn evaluate(config: SimConfig, bars: &[Bar]) -> SweepOutcome {
    let fingerprint = config.fingerprint();
    let run = BatchDriver::from_config(&config).and_then(|driver| driver.run(bars));
    match run {
        Ok(result) => SweepOutcome {
            fingerprint,
            config,
            metrics: Some(result.metrics),
            error: None,
        },
        Err(err) => {
            warn!(fingerprint = %fingerprint, error = %err, "sweep combination failed");
            SweepOutcome {
                fingerprint,
                config,
                metrics: None,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Evaluate every selected combination of `grid` in parallel.
///
/// Outcomes come back in the order the combinations were selected, failed
/// ones included.
pub fn run_sweep(
    bars: &[Bar],
    base: &SimConfig,
    grid: &SweepGrid,
    options: &SweepOptions,
) -> Vec<SweepOutcome> {
    let all = grid.configs(base);
    let total = all.len();
    let selected = select_combinations(all, options.max_combinations, options.seed);
    info!(
        total,
        selected = selected.len(),
        bars = bars.len(),
        "starting sweep"
    );

    let outcomes: Vec<SweepOutcome> = selected
        .into_par_iter()
        .map(|config| evaluate(config, bars))
        .collect();

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(evaluated = outcomes.len(), failed, "sweep complete");
    outcomes
}

/// Successful outcomes with at least `min_trades` trades, best first.
///
/// Order: total return descending, then profit factor descending (an
/// undefined profit factor ranks above any number, as no trade lost),
/// then the shallower drawdown first.
pub fn rank(outcomes: &[SweepOutcome], min_trades: usize) -> Vec<&SweepOutcome> {
    let mut ranked: Vec<&SweepOutcome> = outcomes
        .iter()
        .filter(|o| {
            o.metrics
                .as_ref()
                .is_some_and(|m| m.trade_count >= min_trades)
        })
        .collect();
    ranked.sort_by(|a, b| match (&a.metrics, &b.metrics) {
        (Some(ma), Some(mb)) => compare_metrics(ma, mb),
        _ => Ordering::Equal,
    });
    ranked
}

fn compare_metrics(a: &Metrics, b: &Metrics) -> Ordering {
    b.total_return_pct
        .total_cmp(&a.total_return_pct)
        .then_with(|| profit_factor_key(b).total_cmp(&profit_factor_key(a)))
        .then_with(|| b.max_drawdown_pct.total_cmp(&a.max_drawdown_pct))
}

fn profit_factor_key(m: &Metrics) -> f64 {
    if m.profit_factor.is_nan() {
        f64::INFINITY
    } else {
        m.profit_factor
    }
}
