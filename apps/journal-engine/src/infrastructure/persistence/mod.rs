//! Persistence Adapters
//!
//! Implementations of the ledger port and the historical trade repository.

pub mod in_memory;
pub mod json_file;

pub use in_memory::{InMemoryHistoricalTradeStore, InMemoryTradeLedger, InMemoryTransaction, StoreSnapshot};
pub use json_file::{JsonFileHistoricalTradeStore, JsonFileTradeLedger, JsonFileTransaction};
