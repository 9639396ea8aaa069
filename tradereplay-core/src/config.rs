//! Run configuration.
//!
//! The exit model is an explicit tagged enum. The flat form with optional
//! `sl_pct`/`tp_rr`/`atr_mult_*` fields (`ExecutionSettings`) is accepted for
//! config files and resolved into an `ExitModel` once, at load time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// How stop and target prices are derived at entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExitModel {
    /// Stop at `sl_pct` from entry, target at `sl_pct * tp_rr` on the other side.
    FixedPercent { sl_pct: f64, tp_rr: f64 },
    /// Stop and target at multiples of the bar's volatility reading.
    AtrBased { atr_mult_sl: f64, atr_mult_tp: f64 },
}

impl ExitModel {
    pub fn requires_volatility(&self) -> bool {
        matches!(self, ExitModel::AtrBased { .. })
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let (name_a, a, name_b, b) = match *self {
            ExitModel::FixedPercent { sl_pct, tp_rr } => ("sl_pct", sl_pct, "tp_rr", tp_rr),
            ExitModel::AtrBased {
                atr_mult_sl,
                atr_mult_tp,
            } => ("atr_mult_sl", atr_mult_sl, "atr_mult_tp", atr_mult_tp),
        };
        for (name, value) in [(name_a, a), (name_b, b)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if let ExitModel::FixedPercent { sl_pct, .. } = *self {
            if sl_pct >= 1.0 {
                return Err(SimError::InvalidConfig(format!(
                    "sl_pct must be below 1.0, got {sl_pct}"
                )));
            }
        }
        Ok(())
    }
}

/// Execution parameters for a single simulated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub initial_capital: f64,
    /// Fee as a fraction of notional, charged at entry and at exit.
    pub fee_pct: f64,
    pub exit: ExitModel,
    pub allow_short: bool,
    /// Adverse fill shift at entry and exit, as a fraction of price.
    #[serde(default)]
    pub slippage_pct: f64,
    /// Full bid/ask spread as a fraction of price; half is paid at entry.
    #[serde(default)]
    pub spread_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1000.0,
            fee_pct: 0.0005,
            exit: ExitModel::FixedPercent {
                sl_pct: 0.01,
                tp_rr: 2.0,
            },
            allow_short: true,
            slippage_pct: 0.0,
            spread_pct: 0.0,
        }
    }
}

impl ExecutionConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        for (name, value) in [
            ("fee_pct", self.fee_pct),
            ("slippage_pct", self.slippage_pct),
            ("spread_pct", self.spread_pct),
        ] {
            if !(value.is_finite() && (0.0..1.0).contains(&value)) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }
        self.exit.validate()
    }
}

/// Fraction of capital put at risk per trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub risk_pct: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self { risk_pct: 0.01 }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.risk_pct.is_finite() && self.risk_pct > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "risk_pct must be positive, got {}",
                self.risk_pct
            )));
        }
        Ok(())
    }
}

/// Flat execution settings as written in config files.
///
/// Either both ATR multipliers or both fixed-percent fields must be set.
/// When both pairs are present the ATR pair wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSettings {
    pub initial_capital: f64,
    #[serde(default = "default_fee_pct")]
    pub fee_pct: f64,
    #[serde(default = "default_allow_short")]
    pub allow_short: bool,
    #[serde(default)]
    pub sl_pct: Option<f64>,
    #[serde(default)]
    pub tp_rr: Option<f64>,
    /// Period of the ATR used to build volatility readings, if any.
    #[serde(default)]
    pub atr_window: Option<usize>,
    #[serde(default)]
    pub atr_mult_sl: Option<f64>,
    #[serde(default)]
    pub atr_mult_tp: Option<f64>,
    #[serde(default)]
    pub slippage_pct: f64,
    #[serde(default)]
    pub spread_pct: f64,
}

fn default_fee_pct() -> f64 {
    0.0005
}

fn default_allow_short() -> bool {
    true
}

impl TryFrom<ExecutionSettings> for ExecutionConfig {
    type Error = SimError;

    fn try_from(raw: ExecutionSettings) -> Result<Self, Self::Error> {
        let exit = match (raw.atr_mult_sl, raw.atr_mult_tp, raw.sl_pct, raw.tp_rr) {
            (Some(atr_mult_sl), Some(atr_mult_tp), _, _) => ExitModel::AtrBased {
                atr_mult_sl,
                atr_mult_tp,
            },
            (_, _, Some(sl_pct), Some(tp_rr)) => ExitModel::FixedPercent { sl_pct, tp_rr },
            _ => {
                return Err(SimError::InvalidConfig(
                    "neither ATR (atr_mult_sl/atr_mult_tp) nor fixed (sl_pct/tp_rr) exits are fully set"
                        .into(),
                ))
            }
        };
        let config = ExecutionConfig {
            initial_capital: raw.initial_capital,
            fee_pct: raw.fee_pct,
            exit,
            allow_short: raw.allow_short,
            slippage_pct: raw.slippage_pct,
            spread_pct: raw.spread_pct,
        };
        config.validate()?;
        Ok(config)
    }
}

/// A complete, validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub execution: ExecutionConfig,
    pub risk: RiskConfig,
    /// ATR period used when volatility readings are computed from candles.
    #[serde(default)]
    pub atr_window: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SimConfigFile {
    execution: Option<ExecutionSettings>,
    #[serde(default)]
    risk: Option<RiskConfig>,
}

impl SimConfig {
    pub fn new(execution: ExecutionConfig, risk: RiskConfig) -> Result<Self, SimError> {
        execution.validate()?;
        risk.validate()?;
        Ok(Self {
            execution,
            risk,
            atr_window: None,
        })
    }

    /// Parse a TOML document with an `[execution]` table and optional `[risk]` table.
    pub fn from_toml(content: &str) -> Result<Self, SimError> {
        let file: SimConfigFile = toml::from_str(content)
            .map_err(|e| SimError::InvalidConfig(format!("parse config TOML: {e}")))?;
        let settings = file
            .execution
            .ok_or_else(|| SimError::InvalidConfig("missing [execution] table".into()))?;
        let atr_window = settings.atr_window;
        let execution = ExecutionConfig::try_from(settings)?;
        let risk = file.risk.unwrap_or_default();
        risk.validate()?;
        if atr_window == Some(0) {
            return Err(SimError::InvalidConfig("atr_window must be >= 1".into()));
        }
        Ok(Self {
            execution,
            risk,
            atr_window,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::InvalidConfig(format!("read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two configs with identical parameters share a fingerprint, so sweep
    /// results can be labelled and compared across runs.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
