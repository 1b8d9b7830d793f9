//! Ledger builders shared by integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use journal_engine::domain::shared::{ExecutionId, InstrumentCode, Money, Quantity, Timestamp};
use journal_engine::domain::trade_ledger::{NewTradeExecution, TradeExecution, TradeSide};

/// Execution on a calendar date.
pub fn execution(
    id: i64,
    instrument: &str,
    side: TradeSide,
    quantity: i64,
    price: i64,
    date: &str,
) -> TradeExecution {
    TradeExecution::new(NewTradeExecution {
        id: ExecutionId::new(id),
        instrument: InstrumentCode::new(instrument),
        instrument_name: instrument.to_string(),
        side,
        price: Money::from_i64(price),
        quantity: Quantity::new(quantity),
        executed_at: Timestamp::parse(date).unwrap(),
    })
    .unwrap()
}

/// Buy execution.
pub fn buy(id: i64, instrument: &str, quantity: i64, price: i64, date: &str) -> TradeExecution {
    execution(id, instrument, TradeSide::Buy, quantity, price, date)
}

/// Sell execution.
pub fn sell(id: i64, instrument: &str, quantity: i64, price: i64, date: &str) -> TradeExecution {
    execution(id, instrument, TradeSide::Sell, quantity, price, date)
}

/// A small multi-instrument journal: two closed AAPL round-trips, one losing
/// MSFT round-trip, an open NVDA position and a stray TSLA sell.
pub fn journal() -> Vec<TradeExecution> {
    vec![
        buy(1, "AAPL", 100, 10, "2024-01-01"),
        buy(2, "AAPL", 200, 12, "2024-01-02"),
        sell(3, "AAPL", 150, 15, "2024-01-05"),
        sell(4, "AAPL", 150, 14, "2024-01-10"),
        buy(5, "MSFT", 10, 300, "2024-01-03"),
        sell(6, "MSFT", 10, 280, "2024-01-08"),
        buy(7, "AAPL", 50, 20, "2024-02-01"),
        sell(8, "AAPL", 50, 22, "2024-02-15"),
        buy(9, "NVDA", 5, 500, "2024-02-20"),
        sell(10, "TSLA", 3, 200, "2024-02-21"),
    ]
}
