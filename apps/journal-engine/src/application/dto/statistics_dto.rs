//! Statistics DTOs

use serde::Serialize;

use crate::domain::shared::Timestamp;
use crate::domain::trade_history::TradeStatistics;

/// Trade history statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDto {
    /// Aggregates.
    #[serde(flatten)]
    pub statistics: TradeStatistics,
    /// When the figures were computed.
    pub generated_at: Timestamp,
}

impl From<TradeStatistics> for StatisticsDto {
    fn from(statistics: TradeStatistics) -> Self {
        Self {
            statistics,
            generated_at: Timestamp::now(),
        }
    }
}
