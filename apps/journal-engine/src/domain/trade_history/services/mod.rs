//! Trade history domain services.

mod statistics;

pub use statistics::{InstrumentStatistics, TradeHighlight, TradeStatistics};
