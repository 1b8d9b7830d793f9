//! Historical Trade Repository Traits
//!
//! Defines the persistence abstraction for materialized trades.
//! Implemented by adapters in the infrastructure layer.
//!
//! Every write happens inside a unit of work obtained from
//! [`HistoricalTradeRepository::begin`]. Its changes become visible only
//! on [`HistoricalTradeTransaction::commit`]; dropping the transaction
//! discards them.

use async_trait::async_trait;

use super::aggregate::{HistoricalTrade, NewHistoricalTrade};
use super::errors::StoreError;
use crate::domain::episode::EpisodeKey;
use crate::domain::shared::{HistoricalTradeId, Timestamp};

/// Repository trait for historical trade persistence.
#[async_trait]
pub trait HistoricalTradeRepository: Send + Sync {
    /// Unit of work type.
    type Transaction: HistoricalTradeTransaction;

    /// Open a unit of work.
    ///
    /// Writers are serialized: this waits until any other open transaction
    /// has committed or been dropped.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot start a transaction.
    async fn begin(&self) -> Result<Self::Transaction, StoreError>;

    /// All committed rows, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError>;

    /// First committed row (lowest id) with the given natural key.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError>;

    /// Number of committed rows.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Latest `updated_at` across committed rows.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn latest_update(&self) -> Result<Option<Timestamp>, StoreError>;
}

/// A unit of work over the historical trade store.
#[async_trait]
pub trait HistoricalTradeTransaction: Send + Sync + Sized {
    /// First row (lowest id) with the given key, including uncommitted changes.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError>;

    /// All rows including uncommitted changes, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError>;

    /// Insert a row and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn insert(&mut self, trade: NewHistoricalTrade) -> Result<HistoricalTrade, StoreError>;

    /// Replace an existing row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has the trade's id.
    async fn update(&mut self, trade: &HistoricalTrade) -> Result<(), StoreError>;

    /// Delete a row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    async fn delete(&mut self, id: HistoricalTradeId) -> Result<(), StoreError>;

    /// Delete every row, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn delete_all(&mut self) -> Result<usize, StoreError>;

    /// Publish all changes atomically.
    ///
    /// # Errors
    ///
    /// Returns error if the changes cannot be made durable; nothing is
    /// published in that case.
    async fn commit(self) -> Result<(), StoreError>;
}
