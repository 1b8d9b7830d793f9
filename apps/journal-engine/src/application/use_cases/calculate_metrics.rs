//! Calculate Metrics Use Case

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::CalculateMetricsRequestDto;
use crate::application::errors::JournalError;
use crate::application::ports::TradeLedgerPort;
use crate::domain::episode::{EpisodeMetrics, EpisodeMetricsCalculator};
use crate::domain::shared::{DomainError, ExecutionId};
use crate::domain::trade_ledger::{TradeExecution, TradeSide};

/// Use case for computing episode metrics over explicit executions.
pub struct CalculateMetricsUseCase<L>
where
    L: TradeLedgerPort,
{
    ledger: Arc<L>,
    calculator: EpisodeMetricsCalculator,
}

impl<L> CalculateMetricsUseCase<L>
where
    L: TradeLedgerPort,
{
    /// Create a new `CalculateMetricsUseCase`.
    pub const fn new(ledger: Arc<L>, calculator: EpisodeMetricsCalculator) -> Self {
        Self { ledger, calculator }
    }

    /// Compute metrics for executions the caller already holds.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::Validation` if either list is empty.
    pub fn calculate(
        &self,
        buys: &[TradeExecution],
        sells: &[TradeExecution],
    ) -> Result<EpisodeMetrics, JournalError> {
        Ok(self.calculator.calculate(buys, sells)?)
    }

    /// Load the requested executions from the ledger and compute metrics.
    ///
    /// # Errors
    ///
    /// - `JournalError::Validation` if either id list is empty or an id
    ///   refers to an execution of the other side.
    /// - `JournalError::NotFound` listing every id with no active execution.
    /// - `JournalError::Database` if the ledger cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        request: CalculateMetricsRequestDto,
    ) -> Result<EpisodeMetrics, JournalError> {
        if request.buy_ids.is_empty() {
            return Err(DomainError::EmptyInput {
                field: "buyIds".to_string(),
            }
            .into());
        }
        if request.sell_ids.is_empty() {
            return Err(DomainError::EmptyInput {
                field: "sellIds".to_string(),
            }
            .into());
        }

        let requested: Vec<ExecutionId> = request
            .buy_ids
            .iter()
            .chain(&request.sell_ids)
            .copied()
            .collect();
        let found = self.ledger.find_by_ids(&requested).await?;

        let missing: Vec<String> = requested
            .iter()
            .filter(|id| !found.iter().any(|e| e.id() == **id))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::NotFound {
                entity_type: "execution".to_string(),
                ids: missing,
            }
            .into());
        }

        let buys = pick(&found, &request.buy_ids, TradeSide::Buy)?;
        let sells = pick(&found, &request.sell_ids, TradeSide::Sell)?;
        debug!(buys = buys.len(), sells = sells.len(), "Executions resolved");

        self.calculate(&buys, &sells)
    }
}

/// Executions for `ids` in request order, checking their side.
fn pick(
    found: &[TradeExecution],
    ids: &[ExecutionId],
    side: TradeSide,
) -> Result<Vec<TradeExecution>, DomainError> {
    ids.iter()
        .filter_map(|id| found.iter().find(|e| e.id() == *id))
        .map(|execution| {
            if execution.side() == side {
                Ok(execution.clone())
            } else {
                Err(DomainError::invalid(
                    "side",
                    format!("execution {} is a {}, expected a {side}", execution.id(), execution.side()),
                ))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Money;
    use crate::infrastructure::persistence::InMemoryTradeLedger;
    use crate::test_fixtures::reference_round_trip;
    use rust_decimal_macros::dec;

    fn use_case() -> CalculateMetricsUseCase<InMemoryTradeLedger> {
        CalculateMetricsUseCase::new(
            Arc::new(InMemoryTradeLedger::new(reference_round_trip())),
            EpisodeMetricsCalculator::default(),
        )
    }

    fn request(buys: &[i64], sells: &[i64]) -> CalculateMetricsRequestDto {
        CalculateMetricsRequestDto {
            buy_ids: buys.iter().copied().map(ExecutionId::new).collect(),
            sell_ids: sells.iter().copied().map(ExecutionId::new).collect(),
        }
    }

    #[tokio::test]
    async fn computes_reference_metrics_from_ids() {
        let metrics = use_case().execute(request(&[1, 2], &[3, 4])).await.unwrap();
        assert_eq!(metrics.total_investment, Money::from_i64(3400));
        assert_eq!(metrics.total_revenue, Money::from_i64(4350));
        assert_eq!(metrics.return_rate.round_dp(4), dec!(0.2794));
    }

    #[tokio::test]
    async fn empty_sells_is_validation_error() {
        let err = use_case().execute(request(&[1], &[])).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_ids_are_listed() {
        let err = use_case()
            .execute(request(&[1, 40], &[3, 41]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "execution not found: [40, 41]");
    }

    #[tokio::test]
    async fn wrong_side_is_validation_error() {
        let err = use_case().execute(request(&[3], &[4])).await.unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn calculate_rejects_empty_buys() {
        let sells = reference_round_trip().split_off(2);
        let err = use_case().calculate(&[], &sells).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }
}
