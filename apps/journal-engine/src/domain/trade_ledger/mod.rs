//! Trade Ledger Bounded Context
//!
//! The append-only log of buy/sell executions. It is the source of truth
//! for everything derived by the engine and is only ever read here.
//!
//! # Key Concepts
//!
//! - **TradeExecution**: A single atomic buy or sell fill
//! - **Corrections**: A corrected row is superseded by a new row and is
//!   excluded from every derivation
//! - **Canonical order**: (instrument, timestamp, id) ascending

pub mod execution;
pub mod side;

pub use execution::{NewTradeExecution, TradeExecution, canonical_order, sort_canonical};
pub use side::TradeSide;
