//! JSON-file ledger and historical trade store.
//!
//! The ledger file is a JSON array of executions and is only read. The
//! store file holds a [`StoreSnapshot`] and is rewritten on every commit
//! through a temporary file and a rename, so readers never see a partial
//! write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use super::in_memory::{InMemoryHistoricalTradeStore, InMemoryTransaction, StoreSnapshot};
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

/// Ledger backed by a JSON array file, re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonFileTradeLedger {
    path: PathBuf,
}

impl JsonFileTradeLedger {
    /// Create a ledger reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<TradeExecution>, LedgerError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let executions: Vec<TradeExecution> =
            serde_json::from_slice(&bytes).map_err(|e| LedgerError::Malformed(e.to_string()))?;
        for execution in &executions {
            execution.validate()?;
        }
        debug!(path = %self.path.display(), rows = executions.len(), "Ledger loaded");
        Ok(executions)
    }
}

#[async_trait]
impl TradeLedgerPort for JsonFileTradeLedger {
    async fn active_executions(&self) -> Result<Vec<TradeExecution>, LedgerError> {
        let mut active: Vec<TradeExecution> = self
            .load()
            .await?
            .into_iter()
            .filter(|e| !e.is_corrected())
            .collect();
        sort_canonical(&mut active);
        Ok(active)
    }

    async fn find_by_ids(&self, ids: &[ExecutionId]) -> Result<Vec<TradeExecution>, LedgerError> {
        let mut found: Vec<TradeExecution> = self
            .active_executions()
            .await?
            .into_iter()
            .filter(|e| ids.contains(&e.id()))
            .collect();
        sort_canonical(&mut found);
        Ok(found)
    }
}

// ============================================================================
// Historical trade store
// ============================================================================

/// Historical trade store persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileHistoricalTradeStore {
    path: PathBuf,
    inner: InMemoryHistoricalTradeStore,
}

impl JsonFileHistoricalTradeStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or decoded.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<StoreSnapshot>(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreSnapshot::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            path = %path.display(),
            rows = snapshot.trades.len(),
            "Historical trade store opened"
        );
        Ok(Self {
            path,
            inner: InMemoryHistoricalTradeStore::from_snapshot(snapshot),
        })
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoricalTradeRepository for JsonFileHistoricalTradeStore {
    type Transaction = JsonFileTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        Ok(JsonFileTransaction {
            path: self.path.clone(),
            inner: self.inner.begin_transaction().await,
        })
    }

    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError> {
        self.inner.find_all().await
    }

    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError> {
        self.inner.find_by_key(key).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }

    async fn latest_update(&self) -> Result<Option<Timestamp>, StoreError> {
        self.inner.latest_update().await
    }
}

/// Unit of work that writes the store file before publishing.
#[derive(Debug)]
pub struct JsonFileTransaction {
    path: PathBuf,
    inner: InMemoryTransaction,
}

#[async_trait]
impl HistoricalTradeTransaction for JsonFileTransaction {
    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError> {
        self.inner.find_by_key(key).await
    }

    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError> {
        self.inner.find_all().await
    }

    async fn insert(&mut self, trade: NewHistoricalTrade) -> Result<HistoricalTrade, StoreError> {
        self.inner.insert(trade).await
    }

    async fn update(&mut self, trade: &HistoricalTrade) -> Result<(), StoreError> {
        self.inner.update(trade).await
    }

    async fn delete(&mut self, id: HistoricalTradeId) -> Result<(), StoreError> {
        self.inner.delete(id).await
    }

    async fn delete_all(&mut self) -> Result<usize, StoreError> {
        self.inner.delete_all().await
    }

    async fn commit(self) -> Result<(), StoreError> {
        write_atomically(&self.path, &self.inner.staged_snapshot()).await?;
        self.inner.commit().await
    }
}

async fn write_atomically(path: &Path, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
    let bytes =
        serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), rows = snapshot.trades.len(), "Store file written");
    Ok(())
}
