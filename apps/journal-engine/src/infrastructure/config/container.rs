//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use tracing::info;

use crate::application::ports::TradeLedgerPort;
use crate::application::use_cases::{
    CalculateMetricsUseCase, CheckIntegrityUseCase, GetStatisticsUseCase,
    IdentifyCompletedTradesUseCase, InitializeHistoryUseCase, RepairIntegrityUseCase,
    SyncHistoryUseCase,
};
use crate::config::Config;
use crate::domain::episode::EpisodeMetricsCalculator;
use crate::domain::integrity::IntegrityChecker;
use crate::domain::trade_history::{HistoricalTradeRepository, StoreError};
use crate::infrastructure::persistence::{JsonFileHistoricalTradeStore, JsonFileTradeLedger};

/// Container wired to the JSON-file adapters.
pub type JsonFileContainer = Container<JsonFileTradeLedger, JsonFileHistoricalTradeStore>;

/// Dependency injection container.
///
/// Holds the ledger, the store and the tuned domain services, and hands out
/// use cases sharing them.
pub struct Container<L, R>
where
    L: TradeLedgerPort + 'static,
    R: HistoricalTradeRepository + 'static,
{
    // Ports
    ledger: Arc<L>,
    store: Arc<R>,

    // Domain services
    calculator: EpisodeMetricsCalculator,
    checker: IntegrityChecker,
}

impl<L, R> Container<L, R>
where
    L: TradeLedgerPort + 'static,
    R: HistoricalTradeRepository + 'static,
{
    /// Create a new container with all dependencies.
    pub const fn new(
        ledger: Arc<L>,
        store: Arc<R>,
        calculator: EpisodeMetricsCalculator,
        checker: IntegrityChecker,
    ) -> Self {
        Self {
            ledger,
            store,
            calculator,
            checker,
        }
    }

    /// Get the ledger port.
    pub fn ledger(&self) -> Arc<L> {
        Arc::clone(&self.ledger)
    }

    /// Get the historical trade store.
    pub fn store(&self) -> Arc<R> {
        Arc::clone(&self.store)
    }

    /// Create an `IdentifyCompletedTradesUseCase`.
    pub fn identify_completed_trades_use_case(&self) -> IdentifyCompletedTradesUseCase<L> {
        IdentifyCompletedTradesUseCase::new(Arc::clone(&self.ledger), self.calculator)
    }

    /// Create a `CalculateMetricsUseCase`.
    pub fn calculate_metrics_use_case(&self) -> CalculateMetricsUseCase<L> {
        CalculateMetricsUseCase::new(Arc::clone(&self.ledger), self.calculator)
    }

    /// Create a `SyncHistoryUseCase`.
    pub fn sync_history_use_case(&self) -> SyncHistoryUseCase<L, R> {
        SyncHistoryUseCase::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.store),
            self.calculator,
        )
    }

    /// Create an `InitializeHistoryUseCase`.
    pub fn initialize_history_use_case(&self) -> InitializeHistoryUseCase<L, R> {
        InitializeHistoryUseCase::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.store),
            self.checker,
            self.calculator,
        )
    }

    /// Create a `CheckIntegrityUseCase`.
    pub fn check_integrity_use_case(&self) -> CheckIntegrityUseCase<L, R> {
        CheckIntegrityUseCase::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.store),
            self.checker,
        )
    }

    /// Create a `RepairIntegrityUseCase`.
    pub fn repair_integrity_use_case(&self) -> RepairIntegrityUseCase<L, R> {
        RepairIntegrityUseCase::new(
            Arc::clone(&self.ledger),
            Arc::clone(&self.store),
            self.checker,
        )
    }

    /// Create a `GetStatisticsUseCase`.
    pub fn get_statistics_use_case(&self) -> GetStatisticsUseCase<R> {
        GetStatisticsUseCase::new(Arc::clone(&self.store))
    }
}

impl JsonFileContainer {
    /// Wire the JSON-file adapters from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the store file exists but cannot be loaded.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        let calculator = EpisodeMetricsCalculator::new(config.metrics.annualization_days);
        let checker = IntegrityChecker::new(config.integrity.epsilon, calculator);
        let ledger = JsonFileTradeLedger::new(&config.ledger.path);
        let store = JsonFileHistoricalTradeStore::open(&config.store.path).await?;
        info!(
            ledger = %config.ledger.path,
            store = %config.store.path,
            "Container wired"
        );
        Ok(Self::new(Arc::new(ledger), Arc::new(store), calculator, checker))
    }
}
