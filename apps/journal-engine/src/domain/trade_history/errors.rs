//! Historical trade store errors.

use thiserror::Error;

use crate::domain::shared::HistoricalTradeId;

/// Errors raised by a historical trade store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row does not exist.
    #[error("historical trade not found: {0}")]
    NotFound(HistoricalTradeId),

    /// Underlying file I/O failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be decoded or encoded.
    #[error("store data is corrupt: {0}")]
    Corrupt(String),

    /// The backend refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
