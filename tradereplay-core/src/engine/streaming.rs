//! Streaming driver: bars arrive one at a time (paper trading, live replay).

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::{ExecutionConfig, RiskConfig, SimConfig};
use crate::domain::{Bar, Candle, Signal};
use crate::engine::simulator::{BarEvents, SimState, TradeSimulator};
use crate::error::SimError;
use crate::result::RunResult;

/// Incremental front end over [`TradeSimulator`].
///
/// A fatal error ends the run: every later bar is refused with the same
/// error. Out-of-order or malformed bars are refused without touching state.
#[derive(Debug, Clone)]
pub struct StreamingDriver {
    sim: TradeSimulator,
    failure: Option<SimError>,
}

impl StreamingDriver {
    pub fn new(execution: ExecutionConfig, risk: RiskConfig) -> Result<Self, SimError> {
        Ok(Self {
            sim: TradeSimulator::new(execution, risk)?,
            failure: None,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        Self::new(config.execution.clone(), config.risk)
    }

    /// Process one candle with the strategy's signal and volatility reading.
    pub fn on_bar(
        &mut self,
        candle: &Candle,
        signal: Signal,
        volatility: Option<f64>,
    ) -> Result<BarEvents, SimError> {
        self.push(&Bar::from_candle(candle, signal, volatility))
    }

    /// Process one fully-formed bar.
    pub fn push(&mut self, bar: &Bar) -> Result<BarEvents, SimError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.sim.step(bar) {
            Ok(events) => Ok(events),
            Err(err @ SimError::InvalidInput(_)) => Err(err),
            Err(err) => {
                warn!(timestamp = %bar.timestamp, error = %err, "streaming run aborted");
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Trades, equity samples and metrics accumulated so far.
    pub fn current_result(&self) -> RunResult {
        self.sim.result()
    }

    pub fn state(&self) -> SimState {
        self.sim.state()
    }

    pub fn capital(&self) -> f64 {
        self.sim.capital()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.sim.last_timestamp()
    }

    pub fn failure(&self) -> Option<&SimError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExitModel;
    use chrono::{Duration, TimeZone};

    fn ts(i: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap() + Duration::hours(i)
    }

    fn atr_driver() -> StreamingDriver {
        let execution = ExecutionConfig {
            exit: ExitModel::AtrBased {
                atr_mult_sl: 1.0,
                atr_mult_tp: 2.0,
            },
            ..ExecutionConfig::default()
        };
        StreamingDriver::new(execution, RiskConfig::default()).unwrap()
    }

    #[test]
    fn result_is_queryable_mid_run() {
        let mut driver = atr_driver();
        let candle = Candle::new(ts(0), 100.0, 101.0, 99.0, 100.0);
        driver.on_bar(&candle, Signal::Long, Some(1.0)).unwrap();
        let snapshot = driver.current_result();
        assert_eq!(snapshot.equity.len(), 1);
        assert!(snapshot.open_position.is_some());
        assert!(snapshot.trades.is_empty());
    }

    #[test]
    fn missing_volatility_poisons_the_run() {
        let mut driver = atr_driver();
        let candle = Candle::new(ts(0), 100.0, 101.0, 99.0, 100.0);
        let err = driver.on_bar(&candle, Signal::Long, None).unwrap_err();
        assert!(matches!(err, SimError::MissingVolatilityData { .. }));

        let next = Candle::new(ts(1), 100.0, 101.0, 99.0, 100.0);
        let again = driver.on_bar(&next, Signal::Flat, None).unwrap_err();
        assert_eq!(err, again);
        assert!(driver.failure().is_some());
    }

    #[test]
    fn out_of_order_bar_is_refused_but_run_continues() {
        let mut driver = atr_driver();
        driver
            .on_bar(&Candle::new(ts(1), 100.0, 101.0, 99.0, 100.0), Signal::Flat, None)
            .unwrap();
        let late = Candle::new(ts(0), 100.0, 101.0, 99.0, 100.0);
        assert!(driver.on_bar(&late, Signal::Flat, None).is_err());
        assert!(driver.failure().is_none());
        driver
            .on_bar(&Candle::new(ts(2), 100.0, 101.0, 99.0, 100.0), Signal::Flat, None)
            .unwrap();
        assert_eq!(driver.current_result().equity.len(), 2);
    }
}
