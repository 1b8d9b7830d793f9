//! Integration tests for the generate / sync / check / repair lifecycle
//! over the in-memory adapters.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use journal_engine::application::dto::{RepairOptions, SyncMode};
use journal_engine::domain::episode::{EpisodeMetricsCalculator, WarningKind};
use journal_engine::domain::integrity::{IntegrityChecker, IssueKind, Severity};
use journal_engine::domain::shared::{ExecutionId, Money};
use journal_engine::domain::trade_history::{
    HistoricalTrade, HistoricalTradeRepository, HistoricalTradeTransaction, NewHistoricalTrade,
};
use journal_engine::infrastructure::persistence::{
    InMemoryHistoricalTradeStore, InMemoryTradeLedger,
};
use journal_engine::Container;

use common::{buy, journal, sell};

type Engine = Container<InMemoryTradeLedger, InMemoryHistoricalTradeStore>;

fn engine(rows: Vec<journal_engine::TradeExecution>) -> Engine {
    Container::new(
        Arc::new(InMemoryTradeLedger::new(rows)),
        Arc::new(InMemoryHistoricalTradeStore::new()),
        EpisodeMetricsCalculator::default(),
        IntegrityChecker::default(),
    )
}

fn summary(rows: &[HistoricalTrade]) -> Vec<(String, Money, Money, Decimal, i64)> {
    rows.iter()
        .map(|t| {
            (
                t.key().to_string(),
                t.total_investment(),
                t.total_return(),
                t.return_rate(),
                t.holding_days(),
            )
        })
        .collect()
}

#[tokio::test]
async fn identify_matches_reference_scenario() {
    let engine = engine(journal());
    let trades = engine
        .identify_completed_trades_use_case()
        .execute()
        .await
        .unwrap();

    assert_eq!(trades.len(), 3);
    let first = &trades[0];
    assert_eq!(first.instrument.as_str(), "AAPL");
    assert_eq!(first.total_investment, Money::from_i64(3400));
    assert_eq!(first.total_return, Money::from_i64(950));
    assert_eq!(first.return_rate.round_dp(4), dec!(0.2794));
    assert_eq!(first.holding_days, 9);
    assert_eq!(first.buy_ids, vec![ExecutionId::new(1), ExecutionId::new(2)]);
    assert_eq!(first.sell_ids, vec![ExecutionId::new(3), ExecutionId::new(4)]);
}

#[tokio::test]
async fn regenerating_twice_yields_identical_rows() {
    let engine = engine(journal());
    let sync = engine.sync_history_use_case();

    let first = sync.generate(true).await.unwrap();
    let rows_first = engine.store().find_all().await.unwrap();
    let second = sync.generate(true).await.unwrap();
    let rows_second = engine.store().find_all().await.unwrap();

    assert_eq!(first.created, 3);
    assert_eq!(second.created, 3);
    assert_eq!(second.deleted, 3);
    assert_eq!(summary(&rows_first), summary(&rows_second));
}

#[tokio::test]
async fn sync_on_unchanged_data_is_a_no_op() {
    let engine = engine(journal());
    engine.sync_history_use_case().generate(true).await.unwrap();

    let report = engine.sync_history_use_case().sync().await.unwrap();
    assert_eq!(report.mode, SyncMode::Incremental);
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.skipped, 3);
    assert!(report.success);
}

#[tokio::test]
async fn data_quality_warnings_are_reported() {
    let engine = engine(journal());
    let report = engine.sync_history_use_case().sync().await.unwrap();
    assert!(report.success);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::SellWhileFlat && w.instrument.as_str() == "TSLA")
    );
}

#[tokio::test]
async fn check_after_regenerate_is_valid() {
    let engine = engine(journal());
    engine.sync_history_use_case().generate(true).await.unwrap();

    let report = engine.check_integrity_use_case().execute().await.unwrap();
    assert!(report.is_valid());
    assert!(report.report.issues.is_empty());
    // NVDA is still held.
    assert_eq!(report.report.severity, Severity::Warning);
    assert_eq!(report.orphaned_count, 1);
    assert_eq!(report.report.stats.episode_count, 3);
    assert_eq!(report.report.stats.coverage_ratio, Decimal::ONE);
}

#[tokio::test]
async fn repair_removes_duplicate_key() {
    let engine = engine(journal());
    engine.sync_history_use_case().generate(true).await.unwrap();

    let existing = engine.store().find_all().await.unwrap().remove(0);
    let duplicate = NewHistoricalTrade {
        instrument: existing.instrument().clone(),
        instrument_name: existing.instrument_name().to_string(),
        buy_date: existing.buy_date(),
        sell_date: existing.sell_date(),
        holding_days: existing.holding_days(),
        total_investment: existing.total_investment(),
        total_return: existing.total_return(),
        return_rate: existing.return_rate(),
        buy_ids: existing.buy_ids().to_vec(),
        sell_ids: existing.sell_ids().to_vec(),
    };
    let mut tx = engine.store().begin().await.unwrap();
    tx.insert(duplicate).await.unwrap();
    tx.commit().await.unwrap();

    let before = engine.check_integrity_use_case().execute().await.unwrap();
    assert_eq!(before.report.count_of(IssueKind::Duplicate), 1);

    let report = engine
        .repair_integrity_use_case()
        .execute(RepairOptions {
            remove_duplicates: true,
            ..RepairOptions::default()
        })
        .await
        .unwrap();

    assert_eq!(report.removed_duplicates, 1);
    assert!(report.success);
    let remaining: Vec<_> = engine
        .store()
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.key() == existing.key())
        .collect();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), existing.id());
}

#[tokio::test]
async fn initialize_regenerates_after_correction() {
    let ledger = Arc::new(InMemoryTradeLedger::new(journal()));
    let store = Arc::new(InMemoryHistoricalTradeStore::new());
    let engine = Container::new(
        Arc::clone(&ledger),
        Arc::clone(&store),
        EpisodeMetricsCalculator::default(),
        IntegrityChecker::default(),
    );
    engine.sync_history_use_case().generate(true).await.unwrap();

    // Sell 4 is replaced by a corrected row at a different price.
    assert!(ledger.mark_corrected(ExecutionId::new(4)).await);
    ledger.push(sell(11, "AAPL", 150, 16, "2024-01-10")).await;

    let report = engine
        .initialize_history_use_case()
        .execute(false)
        .await
        .unwrap();
    assert!(!report.pre_check.is_valid());
    assert!(report.regenerated);
    assert!(report.success);

    let after = engine.check_integrity_use_case().execute().await.unwrap();
    assert!(after.is_valid());
    let aapl = store
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.sell_ids().contains(&ExecutionId::new(11)))
        .unwrap();
    assert_eq!(aapl.total_return(), Money::from_i64(1250));
}

#[tokio::test]
async fn statistics_summarize_the_store() {
    let engine = engine(journal());
    engine.sync_history_use_case().generate(true).await.unwrap();

    let stats = engine
        .get_statistics_use_case()
        .execute()
        .await
        .unwrap()
        .statistics;
    assert_eq!(stats.total_trades, 3);
    assert_eq!(stats.profitable_trades, 2);
    assert_eq!(stats.losing_trades, 1);
    // 950 + 100 - 200
    assert_eq!(stats.total_return, Money::from_i64(850));
}

#[tokio::test]
async fn metrics_by_id_report_missing_executions() {
    let engine = engine(vec![
        buy(1, "AAPL", 10, 10, "2024-01-01"),
        sell(2, "AAPL", 10, 12, "2024-01-02"),
    ]);
    let err = engine
        .calculate_metrics_use_case()
        .execute(journal_engine::application::dto::CalculateMetricsRequestDto {
            buy_ids: vec![ExecutionId::new(1)],
            sell_ids: vec![ExecutionId::new(99)],
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
