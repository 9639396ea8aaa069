use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capital after any exit on a bar and before any entry on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    pub timestamp: DateTime<Utc>,
    pub capital: f64,
}
