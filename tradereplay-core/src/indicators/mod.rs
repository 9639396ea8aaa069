//! Volatility readings fed to ATR-based exits.

pub mod atr;

pub use atr::{atr_series, true_range, Atr};
