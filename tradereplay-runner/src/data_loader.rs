//! Bar loading from CSV files.
//!
//! Expected header: `timestamp,open,high,low,close,signal[,volatility]`.
//! Timestamps are RFC 3339. An empty `volatility` cell means no reading.
//! Candle files use the same columns without `signal` and `volatility`.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tradereplay_core::domain::bar::validate_sequence;
use tradereplay_core::{Bar, Candle, SimError, Signal};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: SimError,
    },

    #[error("invalid bar sequence: {0}")]
    Sequence(SimError),
}

#[derive(Debug, Deserialize)]
struct BarRow {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    signal: i8,
    #[serde(default)]
    volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CandleRow {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

/// Read simulator bars from any CSV source.
///
/// Every bar is validated (OHLC sanity, strictly increasing timestamps)
/// before the table is returned.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (i, record) in rdr.deserialize::<BarRow>().enumerate() {
        let row = record?;
        let signal = Signal::try_from(row.signal).map_err(|source| LoadError::Row {
            row: i + 1,
            source,
        })?;
        bars.push(Bar {
            timestamp: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            signal,
            volatility: row.volatility,
        });
    }
    validate_sequence(&bars, None).map_err(LoadError::Sequence)?;
    Ok(bars)
}

/// Read raw candles (no signal column) from any CSV source.
pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut candles = Vec::new();
    for record in rdr.deserialize::<CandleRow>() {
        let row = record?;
        let mut candle = Candle::new(row.timestamp, row.open, row.high, row.low, row.close);
        candle.volume = row.volume.unwrap_or(0.0);
        candles.push(candle);
    }
    Ok(candles)
}

pub fn load_bars_csv(path: &Path) -> Result<Vec<Bar>, LoadError> {
    read_bars(open(path)?)
}

pub fn load_candles_csv(path: &Path) -> Result<Vec<Candle>, LoadError> {
    read_candles(open(path)?)
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARS: &str = "\
timestamp,open,high,low,close,signal,volatility
2024-01-02T09:30:00Z,100,101,99,100.5,0,
2024-01-02T09:31:00Z,100.5,102,100,101.5,1,1.2
2024-01-02T09:32:00Z,101.5,102,100.5,101,-1,1.1
";

    #[test]
    fn reads_bars_with_optional_volatility() {
        let bars = read_bars(BARS.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].volatility, None);
        assert_eq!(bars[0].signal, Signal::Flat);
        assert_eq!(bars[1].signal, Signal::Long);
        assert_eq!(bars[1].volatility, Some(1.2));
        assert_eq!(bars[2].signal, Signal::Short);
    }

    #[test]
    fn volatility_column_may_be_absent() {
        let csv = "timestamp,open,high,low,close,signal\n2024-01-02T09:30:00Z,100,101,99,100,1\n";
        let bars = read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].volatility, None);
    }

    #[test]
    fn out_of_range_signal_is_rejected() {
        let csv = "timestamp,open,high,low,close,signal\n2024-01-02T09:30:00Z,100,101,99,100,2\n";
        let err = read_bars(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Row {
                row: 1,
                source: SimError::InvalidInput(_)
            }
        ));
    }

    #[test]
    fn unordered_rows_are_rejected() {
        let csv = "\
timestamp,open,high,low,close,signal
2024-01-02T09:31:00Z,100,101,99,100,0
2024-01-02T09:30:00Z,100,101,99,100,0
";
        assert!(matches!(
            read_bars(csv.as_bytes()),
            Err(LoadError::Sequence(SimError::InvalidInput(_)))
        ));
    }

    #[test]
    fn reads_candles() {
        let csv = "\
timestamp,open,high,low,close,volume
2024-01-02T09:30:00Z,100,101,99,100,1500
2024-01-02T09:31:00Z,100,101,99,100.5,
";
        let candles = read_candles(csv.as_bytes()).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].volume, 1500.0);
        assert_eq!(candles[1].volume, 0.0);
    }
}
