//! Application errors.

use thiserror::Error;

use super::ports::LedgerError;
use crate::domain::shared::DomainError;
use crate::domain::trade_history::StoreError;

/// Error returned by every engine operation.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Malformed or empty input. Nothing was persisted.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Persistence failure. The unit of work was rolled back.
    #[error("Database error: {0}")]
    Database(String),

    /// Referenced entities do not exist.
    #[error("{entity} not found: [{}]", .ids.join(", "))]
    NotFound {
        /// Entity type.
        entity: String,
        /// Missing identifiers.
        ids: Vec<String>,
    },
}

impl JournalError {
    /// Stable error code for API layers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl From<DomainError> for JournalError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, ids } => Self::NotFound {
                entity: entity_type,
                ids,
            },
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<StoreError> for JournalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound {
                entity: "historical trade".to_string(),
                ids: vec![id.to_string()],
            },
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<LedgerError> for JournalError {
    fn from(err: LedgerError) -> Self {
        Self::Database(err.to_string())
    }
}
