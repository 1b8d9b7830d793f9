//! Initialize History Use Case

use std::sync::Arc;

use tracing::info;

use super::{CheckIntegrityUseCase, SyncHistoryUseCase};
use crate::application::dto::{InitializeReportDto, SyncMode};
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::episode::EpisodeMetricsCalculator;
use crate::domain::integrity::IntegrityChecker;
use crate::domain::trade_history::HistoricalTradeRepository;

/// Use case for bringing the store in line with the ledger at startup.
///
/// Checks integrity first; an invalid store (or `force`) is regenerated,
/// a valid one is synced incrementally.
pub struct InitializeHistoryUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    check: CheckIntegrityUseCase<L, R>,
    sync: SyncHistoryUseCase<L, R>,
}

impl<L, R> InitializeHistoryUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    /// Create a new `InitializeHistoryUseCase`.
    pub fn new(
        ledger: Arc<L>,
        store: Arc<R>,
        checker: IntegrityChecker,
        calculator: EpisodeMetricsCalculator,
    ) -> Self {
        Self {
            check: CheckIntegrityUseCase::new(Arc::clone(&ledger), Arc::clone(&store), checker),
            sync: SyncHistoryUseCase::new(ledger, store, calculator),
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Database` if the check or the sync aborts.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, force: bool) -> Result<InitializeReportDto, JournalError> {
        let pre_check = self.check.execute().await?;
        let regenerated = force || !pre_check.is_valid();
        let mode = if regenerated {
            SyncMode::FullRegenerate
        } else {
            SyncMode::Incremental
        };
        info!(
            valid = pre_check.is_valid(),
            force,
            mode = %mode,
            "Initializing history"
        );

        let sync = self.sync.execute(mode).await?;
        Ok(InitializeReportDto {
            success: sync.success,
            pre_check,
            regenerated,
            sync,
        })
    }
}
