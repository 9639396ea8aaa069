use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short. Multiplies a price move into pnl.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// The single position the simulator may hold at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    /// Effective fill price, after spread and slippage.
    pub entry_price: f64,
    pub size: f64,
    pub stop_price: f64,
    pub target_price: f64,
    /// Fee already debited from capital at open.
    pub entry_fee: f64,
}

impl OpenPosition {
    /// Price-move pnl if closed at `exit_price`, before fees.
    pub fn gross_pnl(&self, exit_price: f64) -> f64 {
        (exit_price - self.entry_price) * self.size * self.direction.sign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn position(direction: Direction) -> OpenPosition {
        OpenPosition {
            direction,
            entry_time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            entry_price: 100.0,
            size: 10.0,
            stop_price: 99.0,
            target_price: 102.0,
            entry_fee: 0.0,
        }
    }

    #[test]
    fn long_gross_pnl() {
        assert_eq!(position(Direction::Long).gross_pnl(102.0), 20.0);
        assert_eq!(position(Direction::Long).gross_pnl(99.0), -10.0);
    }

    #[test]
    fn short_gross_pnl() {
        assert_eq!(position(Direction::Short).gross_pnl(98.0), 20.0);
        assert_eq!(position(Direction::Short).gross_pnl(101.0), -10.0);
    }
}
