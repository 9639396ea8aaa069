//! TradeSimulator: the FLAT/OPEN state machine shared by both drivers.
//!
//! Per bar, in this order:
//! 1. If OPEN: check stop/target (stop wins when both are touched), close.
//! 2. Record one equity sample with the current capital.
//! 3. If FLAT and the signal is directional: size and open at the close.
//!
//! A position opened on a bar is first checked for exit on the next bar.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{ExecutionConfig, RiskConfig};
use crate::costs::CostModel;
use crate::domain::bar::validate_sequence;
use crate::domain::{Bar, ClosedTrade, Direction, EquitySample, ExitReason, OpenPosition, Signal};
use crate::error::SimError;
use crate::exits::compute_exit_prices;
use crate::result::RunResult;
use crate::sizing::PositionSizer;

/// Whether a position is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Flat,
    Open,
}

/// What happened on a single bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarEvents {
    pub exit: Option<ExitReason>,
    pub entry: Option<Direction>,
}

#[derive(Debug, Clone)]
pub struct TradeSimulator {
    config: ExecutionConfig,
    sizer: PositionSizer,
    costs: CostModel,
    capital: f64,
    position: Option<OpenPosition>,
    trades: Vec<ClosedTrade>,
    equity: Vec<EquitySample>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl TradeSimulator {
    pub fn new(config: ExecutionConfig, risk: RiskConfig) -> Result<Self, SimError> {
        config.validate()?;
        risk.validate()?;
        Ok(Self {
            capital: config.initial_capital,
            sizer: PositionSizer::new(&risk),
            costs: CostModel::from_config(&config),
            config,
            position: None,
            trades: Vec::new(),
            equity: Vec::new(),
            last_timestamp: None,
        })
    }

    /// Feed one bar. The bar is validated against the previous one first.
    pub fn step(&mut self, bar: &Bar) -> Result<BarEvents, SimError> {
        bar.validate(self.last_timestamp)?;
        self.advance(bar)
    }

    /// Feed a whole sequence. Every bar is validated before any is processed.
    pub fn replay(&mut self, bars: &[Bar]) -> Result<(), SimError> {
        validate_sequence(bars, self.last_timestamp)?;
        for bar in bars {
            self.advance(bar)?;
        }
        Ok(())
    }

    fn advance(&mut self, bar: &Bar) -> Result<BarEvents, SimError> {
        let mut events = BarEvents::default();

        if self.position.is_some() {
            events.exit = self.evaluate_exit(bar);
        }

        self.equity.push(EquitySample {
            timestamp: bar.timestamp,
            capital: self.capital,
        });
        self.last_timestamp = Some(bar.timestamp);

        if self.position.is_none() && !bar.signal.is_flat() {
            events.entry = self.evaluate_entry(bar)?;
        }

        Ok(events)
    }

    fn evaluate_exit(&mut self, bar: &Bar) -> Option<ExitReason> {
        let position = self.position.as_ref()?;

        let (hit_stop, hit_target) = match position.direction {
            Direction::Long => (
                bar.low <= position.stop_price,
                bar.high >= position.target_price,
            ),
            Direction::Short => (
                bar.high >= position.stop_price,
                bar.low <= position.target_price,
            ),
        };

        // Worst case: when both levels are inside the bar, the stop came first.
        let (reason, level) = if hit_stop {
            (ExitReason::Stop, position.stop_price)
        } else if hit_target {
            (ExitReason::Target, position.target_price)
        } else {
            return None;
        };

        let position = self.position.take()?;
        let exit_price = self.costs.exit_price(position.direction, level);
        let exit_fee = self.costs.fee(exit_price, position.size);

        // Entry fee was debited at open.
        self.capital += position.gross_pnl(exit_price) - exit_fee;

        let trade = ClosedTrade::close(
            position,
            bar.timestamp,
            exit_price,
            reason,
            exit_fee,
            self.config.initial_capital,
        );
        debug!(
            timestamp = %bar.timestamp,
            direction = ?trade.direction,
            reason = ?reason,
            exit_price = trade.exit_price,
            pnl = trade.pnl,
            capital = self.capital,
            "position closed"
        );
        self.trades.push(trade);
        Some(reason)
    }

    fn evaluate_entry(&mut self, bar: &Bar) -> Result<Option<Direction>, SimError> {
        let direction = match bar.signal {
            Signal::Long => Direction::Long,
            Signal::Short if self.config.allow_short => Direction::Short,
            Signal::Short | Signal::Flat => return Ok(None),
        };

        let entry_price = self.costs.entry_price(direction, bar.close);
        let levels = compute_exit_prices(
            &self.config.exit,
            direction,
            entry_price,
            bar.volatility,
            bar.timestamp,
        )?;

        let size = self.sizer.size(self.capital, entry_price, levels.stop_price);
        if size <= 0.0 {
            debug!(
                timestamp = %bar.timestamp,
                direction = ?direction,
                capital = self.capital,
                "entry skipped: zero size"
            );
            return Ok(None);
        }

        let entry_fee = self.costs.fee(entry_price, size);
        self.capital -= entry_fee;
        self.position = Some(OpenPosition {
            direction,
            entry_time: bar.timestamp,
            entry_price,
            size,
            stop_price: levels.stop_price,
            target_price: levels.target_price,
            entry_fee,
        });
        debug!(
            timestamp = %bar.timestamp,
            direction = ?direction,
            entry_price,
            size,
            stop = levels.stop_price,
            target = levels.target_price,
            "position opened"
        );
        Ok(Some(direction))
    }

    pub fn state(&self) -> SimState {
        if self.position.is_some() {
            SimState::Open
        } else {
            SimState::Flat
        }
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        self.position.as_ref()
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn trades(&self) -> &[ClosedTrade] {
        &self.trades
    }

    pub fn equity(&self) -> &[EquitySample] {
        &self.equity
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    /// Snapshot of the run so far.
    pub fn result(&self) -> RunResult {
        RunResult::new(
            self.trades.clone(),
            self.equity.clone(),
            self.position.clone(),
            self.capital,
        )
    }

    pub fn into_result(self) -> RunResult {
        RunResult::new(self.trades, self.equity, self.position, self.capital)
    }
}
