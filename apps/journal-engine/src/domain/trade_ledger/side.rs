//! Execution side (buy or sell).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Shares acquired.
    #[serde(alias = "BUY")]
    Buy,
    /// Shares disposed.
    #[serde(alias = "SELL")]
    Sell,
}

impl TradeSide {
    /// Returns the sign for position calculations.
    ///
    /// Buy = +1, Sell = -1
    #[must_use]
    pub const fn sign(&self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }

    /// Returns true for buys.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}
