//! Integration tests for unit-of-work rollback and per-episode failure
//! collection, using a store wrapper that fails on demand.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use journal_engine::application::dto::RepairOptions;
use journal_engine::application::use_cases::{RepairIntegrityUseCase, SyncHistoryUseCase};
use journal_engine::domain::episode::{EpisodeKey, EpisodeMetricsCalculator};
use journal_engine::domain::integrity::IntegrityChecker;
use journal_engine::domain::shared::{HistoricalTradeId, InstrumentCode, Timestamp};
use journal_engine::domain::trade_history::{
    HistoricalTrade, HistoricalTradeRepository, HistoricalTradeTransaction, NewHistoricalTrade,
    StoreError,
};
use journal_engine::infrastructure::persistence::{
    InMemoryHistoricalTradeStore, InMemoryTradeLedger, InMemoryTransaction,
};

use common::journal;

// =============================================================================
// Failing store
// =============================================================================

/// In-memory store whose commits or inserts can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryHistoricalTradeStore,
    fail_commit: Arc<AtomicBool>,
    /// Inserts for this instrument fail.
    reject_instrument: Option<InstrumentCode>,
}

struct FlakyTransaction {
    inner: InMemoryTransaction,
    fail_commit: bool,
    reject_instrument: Option<InstrumentCode>,
}

#[async_trait]
impl HistoricalTradeRepository for FlakyStore {
    type Transaction = FlakyTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        Ok(FlakyTransaction {
            inner: self.inner.begin_transaction().await,
            fail_commit: self.fail_commit.load(Ordering::SeqCst),
            reject_instrument: self.reject_instrument.clone(),
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

#[async_trait]
impl HistoricalTradeTransaction for FlakyTransaction {
    async fn find_by_key(&self, key: &EpisodeKey) -> Result<Option<HistoricalTrade>, StoreError> {
        self.inner.find_by_key(key).await
    }

    async fn find_all(&self) -> Result<Vec<HistoricalTrade>, StoreError> {
        self.inner.find_all().await
    }

    async fn insert(&mut self, trade: NewHistoricalTrade) -> Result<HistoricalTrade, StoreError> {
        if self.reject_instrument.as_ref() == Some(&trade.instrument) {
            return Err(StoreError::Unavailable(format!("{} rejected", trade.instrument)));
        }
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
        if self.fail_commit {
            return Err(StoreError::Unavailable("commit refused".to_string()));
        }
        self.inner.commit().await
    }
}

fn sync(store: &Arc<FlakyStore>) -> SyncHistoryUseCase<InMemoryTradeLedger, FlakyStore> {
    SyncHistoryUseCase::new(
        Arc::new(InMemoryTradeLedger::new(journal())),
        Arc::clone(store),
        EpisodeMetricsCalculator::default(),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn failed_commit_leaves_store_unchanged() {
    let store = Arc::new(FlakyStore::default());
    sync(&store).generate(true).await.unwrap();
    let before = store.inner.snapshot().await;

    store.fail_commit.store(true, Ordering::SeqCst);
    let err = sync(&store).generate(true).await.unwrap_err();

    assert_eq!(err.code(), "DATABASE_ERROR");
    assert_eq!(store.inner.snapshot().await, before);
}

#[tokio::test]
async fn failed_repair_rolls_back_every_action() {
    let store = Arc::new(FlakyStore::default());
    sync(&store).generate(true).await.unwrap();
    let row = store.find_all().await.unwrap().remove(0);
    let mut tx = store.inner.begin_transaction().await;
    tx.insert(NewHistoricalTrade {
        instrument: row.instrument().clone(),
        instrument_name: row.instrument_name().to_string(),
        buy_date: row.buy_date(),
        sell_date: row.sell_date(),
        holding_days: row.holding_days(),
        total_investment: row.total_investment(),
        total_return: row.total_return(),
        return_rate: row.return_rate(),
        buy_ids: row.buy_ids().to_vec(),
        sell_ids: row.sell_ids().to_vec(),
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();
    let before = store.inner.snapshot().await;

    store.fail_commit.store(true, Ordering::SeqCst);
    let repair = RepairIntegrityUseCase::new(
        Arc::new(InMemoryTradeLedger::new(journal())),
        Arc::clone(&store),
        IntegrityChecker::default(),
    );
    let err = repair.execute(RepairOptions::all()).await.unwrap_err();

    assert_eq!(err.code(), "DATABASE_ERROR");
    assert_eq!(store.inner.snapshot().await, before);
}

#[tokio::test]
async fn per_episode_failures_are_collected_and_batch_commits() {
    let store = Arc::new(FlakyStore {
        reject_instrument: Some(InstrumentCode::new("MSFT")),
        ..FlakyStore::default()
    });

    let report = sync(&store).generate(true).await.unwrap();

    assert!(!report.success);
    assert_eq!(report.errored, 1);
    assert_eq!(report.created, 2);
    assert_eq!(report.errors[0].instrument.as_str(), "MSFT");
    assert!(report.errors[0].key.is_some());
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn concurrent_generates_do_not_duplicate_rows() {
    let store = Arc::new(FlakyStore::default());
    let a = sync(&store);
    let b = sync(&store);

    let (ra, rb) = tokio::join!(a.generate(false), b.generate(false));
    ra.unwrap();
    rb.unwrap();

    assert_eq!(store.count().await.unwrap(), 3);
}
