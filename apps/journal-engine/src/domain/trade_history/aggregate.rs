//! HistoricalTrade aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::episode::{DerivedEpisode, EpisodeKey, EpisodeMetrics};
use crate::domain::shared::{ExecutionId, HistoricalTradeId, InstrumentCode, Money, Timestamp};

/// Command for materializing a new completed trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoricalTrade {
    /// Instrument code.
    pub instrument: InstrumentCode,
    /// Instrument display name.
    pub instrument_name: String,
    /// Earliest buy timestamp.
    pub buy_date: Timestamp,
    /// Latest sell timestamp.
    pub sell_date: Timestamp,
    /// Calendar days held.
    pub holding_days: i64,
    /// Σ buy price × quantity.
    pub total_investment: Money,
    /// Revenue minus investment.
    pub total_return: Money,
    /// total_return / total_investment.
    pub return_rate: Decimal,
    /// Buy executions of the episode.
    pub buy_ids: Vec<ExecutionId>,
    /// Sell executions of the episode.
    pub sell_ids: Vec<ExecutionId>,
}

impl NewHistoricalTrade {
    /// Build the row for a derived episode.
    #[must_use]
    pub fn from_episode(derived: &DerivedEpisode) -> Self {
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
        }
    }

    /// Natural key of the row.
    #[must_use]
    pub fn key(&self) -> EpisodeKey {
        EpisodeKey::new(self.instrument.clone(), self.buy_date, self.sell_date)
    }
}

/// A materialized completed round-trip trade.
///
/// Rows are derived from the ledger and can always be rebuilt from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTrade {
    id: HistoricalTradeId,
    instrument: InstrumentCode,
    #[serde(default)]
    instrument_name: String,
    buy_date: Timestamp,
    sell_date: Timestamp,
    holding_days: i64,
    total_investment: Money,
    total_return: Money,
    return_rate: Decimal,
    buy_ids: Vec<ExecutionId>,
    sell_ids: Vec<ExecutionId>,
    completion_date: Timestamp,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl HistoricalTrade {
    /// Materialize a new row with a store-assigned id.
    #[must_use]
    pub fn create(id: HistoricalTradeId, new: NewHistoricalTrade, now: Timestamp) -> Self {
        Self {
            id,
            instrument: new.instrument,
            instrument_name: new.instrument_name,
            buy_date: new.buy_date,
            sell_date: new.sell_date,
            holding_days: new.holding_days,
            total_investment: new.total_investment,
            total_return: new.total_return,
            return_rate: new.return_rate,
            buy_ids: new.buy_ids,
            sell_ids: new.sell_ids,
            completion_date: new.sell_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the stored derived metrics disagree with a fresh computation.
    #[must_use]
    pub fn metrics_differ(&self, metrics: &EpisodeMetrics) -> bool {
        self.total_investment != metrics.total_investment
            || self.total_return != metrics.total_return
            || self.return_rate != metrics.return_rate
            || self.holding_days != metrics.holding_days
    }

    /// Whether dates or metrics disagree with a fresh computation.
    #[must_use]
    pub fn differs_from(&self, metrics: &EpisodeMetrics) -> bool {
        self.metrics_differ(metrics)
            || self.buy_date != metrics.buy_date
            || self.sell_date != metrics.sell_date
    }

    /// Overwrite the derived fields with freshly computed values.
    pub fn apply_metrics(&mut self, metrics: &EpisodeMetrics) {
        self.total_investment = metrics.total_investment;
        self.total_return = metrics.total_return;
        self.return_rate = metrics.return_rate;
        self.holding_days = metrics.holding_days;
        self.buy_date = metrics.buy_date;
        self.sell_date = metrics.sell_date;
        self.completion_date = metrics.sell_date;
        self.touch();
    }

    /// Replace the execution id lists.
    pub fn set_executions(&mut self, buy_ids: Vec<ExecutionId>, sell_ids: Vec<ExecutionId>) {
        self.buy_ids = buy_ids;
        self.sell_ids = sell_ids;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Natural key of the row.
    #[must_use]
    pub fn key(&self) -> EpisodeKey {
        EpisodeKey::new(self.instrument.clone(), self.buy_date, self.sell_date)
    }

    /// Store id.
    #[must_use]
    pub const fn id(&self) -> HistoricalTradeId {
        self.id
    }

    /// Instrument code.
    #[must_use]
    pub const fn instrument(&self) -> &InstrumentCode {
        &self.instrument
    }

    /// Instrument display name.
    #[must_use]
    pub fn instrument_name(&self) -> &str {
        &self.instrument_name
    }

    /// Earliest buy timestamp.
    #[must_use]
    pub const fn buy_date(&self) -> Timestamp {
        self.buy_date
    }

    /// Latest sell timestamp.
    #[must_use]
    pub const fn sell_date(&self) -> Timestamp {
        self.sell_date
    }

    /// Calendar days held.
    #[must_use]
    pub const fn holding_days(&self) -> i64 {
        self.holding_days
    }

    /// Σ buy price × quantity.
    #[must_use]
    pub const fn total_investment(&self) -> Money {
        self.total_investment
    }

    /// Revenue minus investment.
    #[must_use]
    pub const fn total_return(&self) -> Money {
        self.total_return
    }

    /// total_return / total_investment.
    #[must_use]
    pub const fn return_rate(&self) -> Decimal {
        self.return_rate
    }

    /// Buy execution ids.
    #[must_use]
    pub fn buy_ids(&self) -> &[ExecutionId] {
        &self.buy_ids
    }

    /// Sell execution ids.
    #[must_use]
    pub fn sell_ids(&self) -> &[ExecutionId] {
        &self.sell_ids
    }

    /// When the trade completed (the sell date).
    #[must_use]
    pub const fn completion_date(&self) -> Timestamp {
        self.completion_date
    }

    /// Row creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Last modification time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether the trade made money.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.total_return.is_positive()
    }
}
