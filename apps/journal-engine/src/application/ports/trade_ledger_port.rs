//! Trade Ledger Port (Driven Port)
//!
//! Read-only access to the execution log owned by the journal.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::shared::{DomainError, ExecutionId};
use crate::domain::trade_ledger::TradeExecution;

/// Errors from a ledger adapter.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Ledger source could not be read.
    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger content could not be decoded.
    #[error("Ledger data is malformed: {0}")]
    Malformed(String),

    /// A ledger row failed validation.
    #[error("Invalid ledger row: {0}")]
    InvalidExecution(#[from] DomainError),

    /// Ledger backend unavailable.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Port for reading executions.
#[async_trait]
pub trait TradeLedgerPort: Send + Sync {
    /// Every non-corrected execution, ordered by (instrument, timestamp, id).
    ///
    /// # Errors
    ///
    /// Returns error if the ledger cannot be read.
    async fn active_executions(&self) -> Result<Vec<TradeExecution>, LedgerError>;

    /// Non-corrected executions with the given ids, in canonical order.
    /// Unknown ids are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns error if the ledger cannot be read.
    async fn find_by_ids(&self, ids: &[ExecutionId]) -> Result<Vec<TradeExecution>, LedgerError>;
}
