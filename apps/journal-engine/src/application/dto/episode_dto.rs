//! Episode DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::episode::DerivedEpisode;
use crate::domain::shared::{ExecutionId, InstrumentCode, Money, Timestamp};

/// A completed round-trip as returned by trade identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDto {
    /// Instrument code.
    pub instrument: InstrumentCode,
    /// Instrument display name.
    pub instrument_name: String,
    /// Earliest buy.
    pub buy_date: Timestamp,
    /// Latest sell.
    pub sell_date: Timestamp,
    /// Calendar days held.
    pub holding_days: i64,
    /// Σ buy price × quantity.
    pub total_investment: Money,
    /// Revenue minus investment.
    pub total_return: Money,
    /// total_return / total_investment.
    pub return_rate: Decimal,
    /// Buy execution ids in ledger order.
    pub buy_ids: Vec<ExecutionId>,
    /// Sell execution ids in ledger order.
    pub sell_ids: Vec<ExecutionId>,
    /// Always true for identified episodes.
    pub is_completed: bool,
    /// Equal to the sell date.
    pub completion_date: Timestamp,
}

impl From<&DerivedEpisode> for EpisodeDto {
    fn from(derived: &DerivedEpisode) -> Self {
        let metrics = &derived.metrics;
        Self {
            instrument: derived.episode.instrument().clone(),
            instrument_name: derived.episode.instrument_name().to_string(),
            buy_date: metrics.buy_date,
            sell_date: metrics.sell_date,
            holding_days: metrics.holding_days,
            total_investment: metrics.total_investment,
            total_return: metrics.total_return,
            return_rate: metrics.return_rate,
            buy_ids: derived.episode.buy_ids(),
            sell_ids: derived.episode.sell_ids(),
            is_completed: true,
            completion_date: metrics.sell_date,
        }
    }
}

/// Request to compute metrics for explicit ledger executions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateMetricsRequestDto {
    /// Buy execution ids.
    pub buy_ids: Vec<ExecutionId>,
    /// Sell execution ids.
    pub sell_ids: Vec<ExecutionId>,
}
