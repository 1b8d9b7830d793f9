//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;
mod quantity;
mod timestamp;

pub use identifiers::{ExecutionId, HistoricalTradeId, InstrumentCode};
pub use money::Money;
pub use quantity::Quantity;
pub use timestamp::Timestamp;
