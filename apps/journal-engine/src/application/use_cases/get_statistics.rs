//! Get Statistics Use Case

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::StatisticsDto;
use crate::application::errors::JournalError;
use crate::domain::trade_history::{HistoricalTradeRepository, TradeStatistics};

/// Use case for aggregating the historical trade store.
pub struct GetStatisticsUseCase<R>
where
    R: HistoricalTradeRepository,
{
    store: Arc<R>,
}

impl<R> GetStatisticsUseCase<R>
where
    R: HistoricalTradeRepository,
{
    /// Create a new `GetStatisticsUseCase`.
    pub const fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Database` if the store cannot be read and
    /// `JournalError::Validation` if a total overflows.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<StatisticsDto, JournalError> {
        let trades = self.store.find_all().await?;
        let statistics = TradeStatistics::compute(&trades)?;
        debug!(
            trades = statistics.total_trades,
            win_rate = %statistics.win_rate,
            "Statistics computed"
        );
        Ok(StatisticsDto::from(statistics))
    }
}
