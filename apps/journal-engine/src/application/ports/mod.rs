//! Application Ports (Driven)
//!
//! Ports define how the engine reaches systems it does not own.
//! The historical trade store is a domain repository
//! (see [`crate::domain::trade_history::HistoricalTradeRepository`]).

mod trade_ledger_port;

pub use trade_ledger_port::{LedgerError, TradeLedgerPort};
