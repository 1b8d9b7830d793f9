//! Sync History Use Case
//!
//! Reconciles the historical trade store with the ledger. The whole ledger
//! is re-derived on every call; the store watermark is reported but never
//! used to narrow the scan.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use super::record_warnings;
use crate::application::dto::{SyncErrorDto, SyncMode, SyncReportDto};
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::episode::{DerivedEpisode, EpisodeMetricsCalculator, derive_episodes};
use crate::domain::trade_history::{
    HistoricalTradeRepository, HistoricalTradeTransaction, NewHistoricalTrade, StoreError,
};
use crate::observability::{record_sync, record_sync_failure};

/// What happened to one derived episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
    Skipped,
}

/// Use case for generating and syncing historical trade records.
pub struct SyncHistoryUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    ledger: Arc<L>,
    store: Arc<R>,
    calculator: EpisodeMetricsCalculator,
}

impl<L, R> SyncHistoryUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    /// Create a new `SyncHistoryUseCase`.
    pub const fn new(ledger: Arc<L>, store: Arc<R>, calculator: EpisodeMetricsCalculator) -> Self {
        Self {
            ledger,
            store,
            calculator,
        }
    }

    /// Generate historical records.
    ///
    /// Regenerates from scratch when `force_regenerate` is set or the store
    /// is empty; otherwise only creates rows for keys the store lacks.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn generate(&self, force_regenerate: bool) -> Result<SyncReportDto, JournalError> {
        let mode = if force_regenerate || self.store.count().await? == 0 {
            SyncMode::FullRegenerate
        } else {
            SyncMode::CreateMissing
        };
        self.execute(mode).await
    }

    /// Incrementally sync historical records with the ledger.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn sync(&self) -> Result<SyncReportDto, JournalError> {
        self.execute(SyncMode::Incremental).await
    }

    /// Run one reconciliation in a single unit of work.
    ///
    /// Per-episode failures are collected in the report and the batch still
    /// commits.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Database` if the ledger cannot be read or the
    /// unit of work cannot be opened or committed. Nothing is persisted.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, mode: SyncMode) -> Result<SyncReportDto, JournalError> {
        let started = Instant::now();
        match self.run(mode).await {
            Ok(report) => {
                record_sync(
                    mode.as_str(),
                    report.created,
                    report.updated,
                    report.errored,
                    started.elapsed().as_secs_f64(),
                );
                info!(
                    identified = report.identified,
                    created = report.created,
                    updated = report.updated,
                    skipped = report.skipped,
                    deleted = report.deleted,
                    errored = report.errored,
                    "Historical records synced"
                );
                Ok(report)
            }
            Err(e) => {
                record_sync_failure(mode.as_str());
                error!(error = %e, "Sync aborted, store unchanged");
                Err(e)
            }
        }
    }

    async fn run(&self, mode: SyncMode) -> Result<SyncReportDto, JournalError> {
        let mut report = SyncReportDto::new(mode);
        report.watermark = self.store.latest_update().await?;

        let executions = self.ledger.active_executions().await?;
        report.new_executions = match report.watermark {
            Some(watermark) => executions
                .iter()
                .filter(|e| e.updated_at() > watermark)
                .count(),
            None => executions.len(),
        };

        let derivation = derive_episodes(executions, &self.calculator);
        record_warnings(&derivation.warnings);
        report.identified = derivation.episodes.len() + derivation.failures.len();
        report.checked = derivation.episodes.len();
        report.warnings = derivation.warnings;
        for failure in derivation.failures {
            report.push_error(SyncErrorDto {
                instrument: failure.instrument,
                key: None,
                buy_ids: failure.buy_ids,
                sell_ids: failure.sell_ids,
                message: failure.error.to_string(),
            });
        }

        let mut tx = self.store.begin().await?;
        if mode == SyncMode::FullRegenerate {
            report.deleted = tx.delete_all().await?;
        }

        for derived in &derivation.episodes {
            match apply(&mut tx, mode, derived).await {
                Ok(Outcome::Created) => report.created += 1,
                Ok(Outcome::Updated) => report.updated += 1,
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    warn!(key = %derived.key(), error = %e, "Episode not persisted");
                    report.push_error(SyncErrorDto {
                        instrument: derived.episode.instrument().clone(),
                        key: Some(derived.key()),
                        buy_ids: derived.episode.buy_ids(),
                        sell_ids: derived.episode.sell_ids(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tx.commit().await?;
        Ok(report)
    }
}

async fn apply<T>(tx: &mut T, mode: SyncMode, derived: &DerivedEpisode) -> Result<Outcome, StoreError>
where
    T: HistoricalTradeTransaction,
{
    if mode != SyncMode::FullRegenerate {
        if let Some(mut existing) = tx.find_by_key(&derived.key()).await? {
            if mode == SyncMode::CreateMissing || !existing.metrics_differ(&derived.metrics) {
                return Ok(Outcome::Skipped);
            }
            existing.apply_metrics(&derived.metrics);
            existing.set_executions(derived.episode.buy_ids(), derived.episode.sell_ids());
            tx.update(&existing).await?;
            return Ok(Outcome::Updated);
        }
    }
    tx.insert(NewHistoricalTrade::from_episode(derived)).await?;
    Ok(Outcome::Created)
}
