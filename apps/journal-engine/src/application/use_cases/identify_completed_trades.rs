//! Identify Completed Trades Use Case

use std::sync::Arc;

use tracing::{info, warn};

use super::record_warnings;
use crate::application::dto::EpisodeDto;
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::episode::{EpisodeMetricsCalculator, derive_episodes};

/// Use case for listing every closed round-trip in the ledger.
///
/// Nothing is persisted.
pub struct IdentifyCompletedTradesUseCase<L>
where
    L: TradeLedgerPort,
{
    ledger: Arc<L>,
    calculator: EpisodeMetricsCalculator,
}

impl<L> IdentifyCompletedTradesUseCase<L>
where
    L: TradeLedgerPort,
{
    /// Create a new `IdentifyCompletedTradesUseCase`.
    pub const fn new(ledger: Arc<L>, calculator: EpisodeMetricsCalculator) -> Self {
        Self { ledger, calculator }
    }

    /// Execute the use case.
    ///
    /// Episodes whose metrics cannot be computed are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Database` if the ledger cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<EpisodeDto>, JournalError> {
        let executions = self.ledger.active_executions().await?;
        let derivation = derive_episodes(executions, &self.calculator);
        record_warnings(&derivation.warnings);

        for failure in &derivation.failures {
            warn!(
                instrument = %failure.instrument,
                error = %failure.error,
                "Episode skipped"
            );
        }

        info!(
            episodes = derivation.episodes.len(),
            open_positions = derivation.open_positions.len(),
            "Completed trades identified"
        );
        Ok(derivation.episodes.iter().map(EpisodeDto::from).collect())
    }
}
