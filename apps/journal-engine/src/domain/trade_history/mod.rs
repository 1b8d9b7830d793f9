//! Trade History Bounded Context
//!
//! The derived store of completed round-trip trades. Every row is
//! recomputable from the ledger; the engine keeps the two in step.
//!
//! # Key Concepts
//!
//! - **HistoricalTrade**: A materialized episode with its metrics and the
//!   ids of the executions it was built from
//! - **Natural key**: (instrument, buy_date, sell_date), expected unique
//! - **Unit of work**: All writes go through a transaction that publishes
//!   on commit and rolls back on drop

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod services;

pub use aggregate::{HistoricalTrade, NewHistoricalTrade};
pub use errors::StoreError;
pub use repository::{HistoricalTradeRepository, HistoricalTradeTransaction};
pub use services::{InstrumentStatistics, TradeHighlight, TradeStatistics};
