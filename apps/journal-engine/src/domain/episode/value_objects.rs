//! Episode value objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{ExecutionId, InstrumentCode, Money, Quantity, Timestamp};

/// Financial metrics of a closed episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeMetrics {
    /// Σ buy price × quantity.
    pub total_investment: Money,
    /// Σ sell price × quantity.
    pub total_revenue: Money,
    /// Revenue minus investment.
    pub total_return: Money,
    /// total_return / total_investment.
    pub return_rate: Decimal,
    /// Earliest buy.
    pub buy_date: Timestamp,
    /// Latest sell.
    pub sell_date: Timestamp,
    /// Calendar days between buy_date and sell_date.
    pub holding_days: i64,
    /// Quantity-weighted buy price.
    pub avg_buy_price: Money,
    /// Quantity-weighted sell price.
    pub avg_sell_price: Money,
    /// return_rate / holding_days (0 for same-day round-trips).
    pub daily_return_rate: Decimal,
    /// daily_return_rate × trading days per year.
    pub annualized_return_rate: Decimal,
    /// total_return > 0.
    pub is_profitable: bool,
    /// Shares bought.
    pub total_buy_quantity: Quantity,
    /// Shares sold.
    pub total_sell_quantity: Quantity,
}

/// Kind of data-quality problem seen while tracking a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A sell arrived while the running position was zero.
    SellWhileFlat,
    /// A sell was larger than the running position; the position was clamped to zero.
    Oversell,
    /// An execution for another instrument was fed to the tracker.
    InstrumentMismatch,
    /// An instrument holds more shares bought than sold (unrealized holding).
    OpenPosition,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SellWhileFlat => "sell_while_flat",
            Self::Oversell => "oversell",
            Self::InstrumentMismatch => "instrument_mismatch",
            Self::OpenPosition => "open_position",
        };
        f.write_str(s)
    }
}

/// A non-fatal finding about the ledger contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    /// What went wrong.
    pub kind: WarningKind,
    /// Instrument concerned.
    pub instrument: InstrumentCode,
    /// Offending execution, if any.
    pub execution_id: Option<ExecutionId>,
    /// Human-readable description.
    pub message: String,
}

impl DataQualityWarning {
    /// Create a warning.
    pub fn new(
        kind: WarningKind,
        instrument: InstrumentCode,
        execution_id: Option<ExecutionId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            instrument,
            execution_id,
            message: message.into(),
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.instrument, self.message)
    }
}
