//! In-memory ledger and historical trade store.
//!
//! Suitable for tests, embedding and as the working set behind the
//! JSON-file adapters.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::application::ports::{LedgerError, TradeLedgerPort};
use crate::domain::episode::EpisodeKey;
use crate::domain::shared::{ExecutionId, HistoricalTradeId, Timestamp};
use crate::domain::trade_history::{
    HistoricalTrade, HistoricalTradeRepository, HistoricalTradeTransaction, NewHistoricalTrade,
    StoreError,
};
use crate::domain::trade_ledger::{TradeExecution, sort_canonical};

// ============================================================================
// Ledger
// ============================================================================

/// In-memory implementation of `TradeLedgerPort`.
#[derive(Debug, Default)]
pub struct InMemoryTradeLedger {
    executions: RwLock<Vec<TradeExecution>>,
}

impl InMemoryTradeLedger {
    /// Create a ledger holding `executions`.
    #[must_use]
    pub fn new(executions: Vec<TradeExecution>) -> Self {
        Self {
            executions: RwLock::new(executions),
        }
    }

    /// Append an execution.
    pub async fn push(&self, execution: TradeExecution) {
        self.executions.write().await.push(execution);
    }

    /// Flag an execution as corrected. Returns false if the id is unknown.
    pub async fn mark_corrected(&self, id: ExecutionId) -> bool {
        let mut executions = self.executions.write().await;
        let Some(index) = executions.iter().position(|e| e.id() == id) else {
            return false;
        };
        let row = executions.remove(index).corrected();
        executions.insert(index, row);
        true
    }

    /// Number of rows, corrected ones included.
    pub async fn len(&self) -> usize {
        self.executions.read().await.len()
    }

    /// Whether the ledger has no rows.
    pub async fn is_empty(&self) -> bool {
        self.executions.read().await.is_empty()
    }
}

#[async_trait]
impl TradeLedgerPort for InMemoryTradeLedger {
    async fn active_executions(&self) -> Result<Vec<TradeExecution>, LedgerError> {
        let mut active: Vec<TradeExecution> = self
            .executions
            .read()
            .await
            .iter()
            .filter(|e| !e.is_corrected())
            .cloned()
            .collect();
        sort_canonical(&mut active);
        Ok(active)
    }

    async fn find_by_ids(&self, ids: &[ExecutionId]) -> Result<Vec<TradeExecution>, LedgerError> {
        let mut found: Vec<TradeExecution> = self
            .executions
            .read()
            .await
            .iter()
            .filter(|e| !e.is_corrected() && ids.contains(&e.id()))
            .cloned()
            .collect();
        sort_canonical(&mut found);
        Ok(found)
    }
}

// ============================================================================
// Historical trade store
// ============================================================================

/// Serializable image of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Highest id ever assigned.
    pub last_id: i64,
    /// Rows ordered by id.
    pub trades: Vec<HistoricalTrade>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    last_id: i64,
    trades: BTreeMap<HistoricalTradeId, HistoricalTrade>,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let highest = snapshot.trades.iter().map(|t| t.id().value()).max().unwrap_or(0);
        Self {
            last_id: snapshot.last_id.max(highest),
            trades: snapshot.trades.into_iter().map(|t| (t.id(), t)).collect(),
        }
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            last_id: self.last_id,
            trades: self.trades.values().cloned().collect(),
        }
    }

    fn find_by_key(&self, key: &EpisodeKey) -> Option<HistoricalTrade> {
        self.trades.values().find(|t| &t.key() == key).cloned()
    }
}

/// In-memory implementation of `HistoricalTradeRepository`.
///
/// Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoricalTradeStore {
    state: Arc<RwLock<StoreState>>,
    writer: Arc<Mutex<()>>,
}

impl InMemoryHistoricalTradeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::from_snapshot(snapshot))),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Current committed image.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.snapshot()
    }

    /// Open a unit of work (inherent form of [`HistoricalTradeRepository::begin`]).
    pub async fn begin_transaction(&self) -> InMemoryTransaction {
        let guard = Arc::clone(&self.writer).lock_owned().await;
        let staged = self.state.read().await.clone();
        debug!(rows = staged.trades.len(), "Store transaction opened");
        InMemoryTransaction {
            _writer: guard,
            target: Arc::clone(&self.state),
            staged,
        }
    }
}

#[async_trait]
impl HistoricalTradeRepository for InMemoryHistoricalTradeStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        Ok(self.begin_transaction().await)
    }

    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError> {
        Ok(self.state.read().await.trades.values().cloned().collect())
    }

    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError> {
        Ok(self.state.read().await.find_by_key(key))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.read().await.trades.len())
    }

    async fn latest_update(&self) -> Result<Option<Timestamp>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .trades
            .values()
            .map(HistoricalTrade::updated_at)
            .max())
    }
}

/// Unit of work over an [`InMemoryHistoricalTradeStore`].
///
/// Holds the store's writer lock until committed or dropped. Changes are
/// made to a private copy that replaces the shared rows on commit.
#[derive(Debug)]
pub struct InMemoryTransaction {
    _writer: OwnedMutexGuard<()>,
    target: Arc<RwLock<StoreState>>,
    staged: StoreState,
}

impl InMemoryTransaction {
    /// Image of the staged rows, as they would look after commit.
    #[must_use]
    pub fn staged_snapshot(&self) -> StoreSnapshot {
        self.staged.snapshot()
    }
}

#[async_trait]
impl HistoricalTradeTransaction for InMemoryTransaction {
    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError> {
        Ok(self.staged.find_by_key(key))
    }

    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError> {
        Ok(self.staged.trades.values().cloned().collect())
    }

    async fn insert(&mut self, trade: NewHistoricalTrade) -> Result<HistoricalTrade, StoreError> {
        self.staged.last_id += 1;
        let id = HistoricalTradeId::new(self.staged.last_id);
        let row = HistoricalTrade::create(id, trade, Timestamp::now());
        self.staged.trades.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&mut self, trade: &HistoricalTrade) -> Result<(), StoreError> {
        let slot = self
            .staged
            .trades
            .get_mut(&trade.id())
            .ok_or(StoreError::NotFound(trade.id()))?;
        *slot = trade.clone();
        Ok(())
    }

    async fn delete(&mut self, id: HistoricalTradeId) -> Result<(), StoreError> {
        self.staged
            .trades
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete_all(&mut self) -> Result<usize, StoreError> {
        let removed = self.staged.trades.len();
        self.staged.trades.clear();
        Ok(removed)
    }

    async fn commit(self) -> Result<(), StoreError> {
        let rows = self.staged.trades.len();
        *self.target.write().await = self.staged;
        debug!(rows, "Store transaction committed");
        Ok(())
    }
}
