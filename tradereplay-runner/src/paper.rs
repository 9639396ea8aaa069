//! Paper replay: candles arrive one at a time and go through a signal
//! source, an incremental ATR and the streaming driver.

use tracing::info;
use tradereplay_core::engine::BarEvents;
use tradereplay_core::indicators::Atr;
use tradereplay_core::signals::{window_len, SignalSource};
use tradereplay_core::{Bar, Candle, RunResult, Signal, SimConfig, SimError, StreamingDriver};

pub struct PaperSession {
    driver: StreamingDriver,
    source: Box<dyn SignalSource>,
    atr: Option<Atr>,
    /// The most recent candles, at most `source.lookback()` of them.
    history: Vec<Candle>,
}

impl PaperSession {
    /// `atr_period` overrides `config.atr_window` when set.
    pub fn new(
        config: &SimConfig,
        source: Box<dyn SignalSource>,
        atr_period: Option<usize>,
    ) -> Result<Self, SimError> {
        let period = atr_period.or(config.atr_window);
        if period == Some(0) {
            return Err(SimError::InvalidConfig("atr period must be >= 1".into()));
        }
        if config.execution.exit.requires_volatility() && period.is_none() {
            return Err(SimError::InvalidConfig(
                "ATR exits need an ATR period for paper replay".into(),
            ));
        }
        Ok(Self {
            driver: StreamingDriver::from_config(config)?,
            source,
            atr: period.map(Atr::new),
            history: Vec::new(),
        })
    }

    /// Feed the next candle.
    ///
    /// A malformed or out-of-order candle is refused before it reaches the
    /// signal source or the ATR, so the session can continue afterwards.
    pub fn on_candle(&mut self, candle: Candle) -> Result<BarEvents, SimError> {
        if let Some(err) = self.driver.failure() {
            return Err(err.clone());
        }
        Bar::from_candle(&candle, Signal::Flat, None).validate(self.driver.last_timestamp())?;

        let volatility = self.atr.as_mut().and_then(|atr| atr.update(&candle));
        self.history.push(candle);
        let keep = window_len(self.source.as_ref(), self.history.len());
        let excess = self.history.len() - keep;
        self.history.drain(..excess);

        let signal = self.source.produce_signal(&self.history);
        let current = &self.history[self.history.len() - 1];
        self.driver.on_bar(current, signal, volatility)
    }

    /// Replay a whole candle table, stopping at the first error.
    pub fn replay(&mut self, candles: impl IntoIterator<Item = Candle>) -> Result<(), SimError> {
        let mut count = 0usize;
        for candle in candles {
            self.on_candle(candle)?;
            count += 1;
        }
        info!(
            source = self.source.name(),
            candles = count,
            trades = self.driver.current_result().trades.len(),
            "paper replay complete"
        );
        Ok(())
    }

    pub fn result(&self) -> RunResult {
        self.driver.current_result()
    }

    pub fn driver(&self) -> &StreamingDriver {
        &self.driver
    }
}
