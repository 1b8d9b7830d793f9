//! Repair Integrity Use Case
//!
//! Repairs run in a fixed order inside one unit of work: duplicates, then
//! unresolved references, then metric drift. A fresh check runs after the
//! commit.
//!
//! Duplicate removal keeps the lowest-id member whose references resolve,
//! so the later reference pass never deletes the last row of an episode.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::CheckIntegrityUseCase;
use crate::application::dto::{RepairActionDto, RepairActionKind, RepairOptions, RepairReportDto};
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::integrity::{ExecutionIndex, IntegrityChecker, find_duplicates};
use crate::domain::shared::HistoricalTradeId;
use crate::domain::trade_history::{
    HistoricalTrade, HistoricalTradeRepository, HistoricalTradeTransaction, StoreError,
};
use crate::observability::record_repair_action;

/// Use case for repairing the historical trade store.
pub struct RepairIntegrityUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    ledger: Arc<L>,
    store: Arc<R>,
    checker: IntegrityChecker,
}

impl<L, R> RepairIntegrityUseCase<L, R>
where
    L: TradeLedgerPort,
    R: HistoricalTradeRepository,
{
    /// Create a new `RepairIntegrityUseCase`.
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
    /// Returns `JournalError::Database` if the ledger cannot be read or any
    /// store write fails. The unit of work is then rolled back as a whole.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, options: RepairOptions) -> Result<RepairReportDto, JournalError> {
        let executions = self.ledger.active_executions().await?;
        let index = ExecutionIndex::new(&executions);
        let mut tx = self.store.begin().await?;
        let mut actions = Vec::new();

        if options.remove_duplicates {
            actions.extend(remove_duplicates(&mut tx, &index).await?);
        }
        if options.update_references {
            actions.extend(remove_invalid_references(&mut tx, &index).await?);
        }
        if options.fix_inconsistencies {
            actions.extend(self.fix_inconsistencies(&mut tx, &index).await?);
        }

        tx.commit().await?;
        for action in &actions {
            record_repair_action(action.kind.as_str());
        }

        let post_repair_check = CheckIntegrityUseCase::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.store),
            self.checker,
        )
        .execute()
        .await?;

        let report = RepairReportDto::new(options, actions, post_repair_check);
        info!(
            removed_duplicates = report.removed_duplicates,
            removed_invalid_references = report.removed_invalid_references,
            fixed_inconsistencies = report.fixed_inconsistencies,
            success = report.success,
            "Integrity repair finished"
        );
        Ok(report)
    }

    async fn fix_inconsistencies<T>(
        &self,
        tx: &mut T,
        index: &ExecutionIndex<'_>,
    ) -> Result<Vec<RepairActionDto>, StoreError>
    where
        T: HistoricalTradeTransaction,
    {
        let mut actions = Vec::new();
        for mut trade in tx.find_all().await? {
            let resolution = index.resolve(&trade);
            if !resolution.is_complete() {
                continue;
            }
            let metrics = match self.checker.recompute(&resolution) {
                Ok(metrics) => metrics,
                Err(e) => {
                    warn!(trade_id = %trade.id(), error = %e, "Cannot recompute trade");
                    continue;
                }
            };
            if !trade.differs_from(&metrics) {
                continue;
            }
            let detail = format!(
                "investment {} -> {}, return {} -> {}",
                trade.total_investment(),
                metrics.total_investment,
                trade.total_return(),
                metrics.total_return
            );
            trade.apply_metrics(&metrics);
            tx.update(&trade).await?;
            actions.push(RepairActionDto {
                kind: RepairActionKind::FixedInconsistency,
                trade_id: trade.id(),
                instrument: trade.instrument().clone(),
                detail,
            });
        }
        Ok(actions)
    }
}

async fn remove_duplicates<T>(
    tx: &mut T,
    index: &ExecutionIndex<'_>,
) -> Result<Vec<RepairActionDto>, StoreError>
where
    T: HistoricalTradeTransaction,
{
    let trades = tx.find_all().await?;
    let by_id: HashMap<HistoricalTradeId, &HistoricalTrade> =
        trades.iter().map(|t| (t.id(), t)).collect();
    let mut actions = Vec::new();
    for group in find_duplicates(&trades) {
        let resolves = |id: HistoricalTradeId| {
            by_id
                .get(&id)
                .is_some_and(|t| index.resolve(t).is_complete())
        };
        let Some(keeper) = group.keeper_where(resolves) else {
            continue;
        };
        for id in group.redundant(keeper) {
            tx.delete(id).await?;
            actions.push(RepairActionDto {
                kind: RepairActionKind::RemovedDuplicate,
                trade_id: id,
                instrument: group.key.instrument.clone(),
                detail: format!("duplicate of trade {keeper} for {}", group.key),
            });
        }
    }
    Ok(actions)
}

async fn remove_invalid_references<T>(
    tx: &mut T,
    index: &ExecutionIndex<'_>,
) -> Result<Vec<RepairActionDto>, StoreError>
where
    T: HistoricalTradeTransaction,
{
    let mut actions = Vec::new();
    for trade in tx.find_all().await? {
        let resolution = index.resolve(&trade);
        if resolution.is_complete() {
            continue;
        }
        tx.delete(trade.id()).await?;
        actions.push(RepairActionDto {
            kind: RepairActionKind::RemovedInvalidReference,
            trade_id: trade.id(),
            instrument: trade.instrument().clone(),
            detail: resolution.describe(),
        });
    }
    Ok(actions)
}
