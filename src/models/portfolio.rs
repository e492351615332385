//! Portfolio history

use serde::{Deserialize, Serialize};

use super::number::lenient_f64;

/// Total portfolio value recorded on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    /// Date of the measurement
    pub date: String,

    /// Portfolio value on that date
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: f64,
}

impl PortfolioPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}
