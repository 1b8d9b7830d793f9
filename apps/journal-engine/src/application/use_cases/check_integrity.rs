//! Check Integrity Use Case

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use tracing::{info, warn};

use crate::application::dto::IntegrityReportDto;
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::integrity::IntegrityChecker;
use crate::domain::trade_history::HistoricalTradeRepository;
use crate::observability::record_integrity_check;

/// Use case for comparing the historical trade store with the ledger.
///
/// Read-only.
pub struct CheckIntegrityUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    ledger: Arc<L>,
    store: Arc<R>,
    checker: IntegrityChecker,
}

impl<L, R> CheckIntegrityUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    /// Create a new `CheckIntegrityUseCase`.
    pub const fn new(ledger: Arc<L>, store: Arc<R>, checker: IntegrityChecker) -> Self {
        Self {
            ledger,
            store,
            checker,
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Database` if the ledger or store cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<IntegrityReportDto, JournalError> {
        let executions = self.ledger.active_executions().await?;
        let trades = self.store.find_all().await?;
        let report = self.checker.check(&executions, &trades);

        record_integrity_check(
            &report.severity.to_string(),
            report.issues.len(),
            report.stats.coverage_ratio.to_f64().unwrap_or_default(),
        );
        if report.is_valid {
            info!(
                severity = %report.severity,
                warnings = report.warnings.len(),
                trades = report.stats.historical_trade_count,
                "Integrity check passed"
            );
        } else {
            warn!(
                issues = report.issues.len(),
                duplicates = report.duplicates.len(),
                "Integrity check found problems"
            );
        }

        Ok(IntegrityReportDto::from(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::SyncHistoryUseCase;
    use crate::domain::episode::EpisodeMetricsCalculator;
    use crate::domain::integrity::{IssueKind, Severity};
    use crate::domain::shared::ExecutionId;
    use crate::infrastructure::persistence::{InMemoryHistoricalTradeStore, InMemoryTradeLedger};
    use crate::test_fixtures::{buy, reference_round_trip};

    async fn generated(
        ledger: &Arc<InMemoryTradeLedger>,
    ) -> CheckIntegrityUseCase<InMemoryTradeLedger, InMemoryHistoricalTradeStore> {
        let store = Arc::new(InMemoryHistoricalTradeStore::new());
        SyncHistoryUseCase::new(
            Arc::clone(ledger),
            Arc::clone(&store),
            EpisodeMetricsCalculator::default(),
        )
        .generate(true)
        .await
        .unwrap();
        CheckIntegrityUseCase::new(Arc::clone(ledger), store, IntegrityChecker::default())
    }

    #[tokio::test]
    async fn regenerated_store_is_valid() {
        let ledger = Arc::new(InMemoryTradeLedger::new(reference_round_trip()));
        let report = generated(&ledger).await.execute().await.unwrap();
        assert!(report.is_valid());
        assert!(report.report.issues.is_empty());
        assert_eq!(report.report.severity, Severity::Ok);
        assert_eq!(report.report.stats.historical_trade_count, 1);
    }

    #[tokio::test]
    async fn open_position_is_a_warning() {
        let ledger = Arc::new(InMemoryTradeLedger::new(reference_round_trip()));
        let check = generated(&ledger).await;
        ledger.push(buy(7, "AAPL", 10, 20, "2024-02-01")).await;

        let report = check.execute().await.unwrap();
        assert!(report.is_valid());
        assert_eq!(report.report.severity, Severity::Warning);
        assert_eq!(report.orphaned_count, 1);
    }

    #[tokio::test]
    async fn corrected_reference_is_invalid() {
        let ledger = Arc::new(InMemoryTradeLedger::new(reference_round_trip()));
        let check = generated(&ledger).await;
        assert!(ledger.mark_corrected(ExecutionId::new(3)).await);

        let report = check.execute().await.unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.report.count_of(IssueKind::InvalidReference), 1);
    }
}
