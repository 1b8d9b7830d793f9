//! Builders shared by unit tests.

use chrono::Duration;

use crate::domain::shared::{ExecutionId, InstrumentCode, Money, Quantity, Timestamp};
use crate::domain::trade_ledger::{NewTradeExecution, TradeExecution, TradeSide};

/// Execution at `start + offset_minutes`.
pub fn execution_at(
    id: i64,
    instrument: &str,
    side: TradeSide,
    quantity: i64,
    price: i64,
    start: Timestamp,
    offset_minutes: i64,
) -> TradeExecution {
    TradeExecution::new(NewTradeExecution {
        id: ExecutionId::new(id),
        instrument: InstrumentCode::new(instrument),
        instrument_name: format!("{instrument} Inc."),
        side,
        price: Money::from_i64(price),
        quantity: Quantity::new(quantity),
        executed_at: Timestamp::new(start.as_datetime() + Duration::minutes(offset_minutes)),
    })
    .unwrap()
}

fn execution(id: i64, instrument: &str, side: TradeSide, quantity: i64, price: i64, at: &str) -> TradeExecution {
    execution_at(id, instrument, side, quantity, price, Timestamp::parse(at).unwrap(), 0)
}

/// Buy execution.
pub fn buy(id: i64, instrument: &str, quantity: i64, price: i64, at: &str) -> TradeExecution {
    execution(id, instrument, TradeSide::Buy, quantity, price, at)
}

/// Sell execution.
pub fn sell(id: i64, instrument: &str, quantity: i64, price: i64, at: &str) -> TradeExecution {
    execution(id, instrument, TradeSide::Sell, quantity, price, at)
}

/// The reference round-trip: 100@10 + 200@12 bought, 150@15 + 150@14 sold.
pub fn reference_round_trip() -> Vec<TradeExecution> {
    vec![
        buy(1, "AAPL", 100, 10, "2024-01-01"),
        buy(2, "AAPL", 200, 12, "2024-01-02"),
        sell(3, "AAPL", 150, 15, "2024-01-05"),
        sell(4, "AAPL", 150, 14, "2024-01-10"),
    ]
}
