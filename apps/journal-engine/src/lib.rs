// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Journal Engine - Rust Core Library
//!
//! Derives completed round-trip trades from a personal trading journal's
//! execution ledger and keeps a materialized history of them consistent.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `trade_ledger`: `TradeExecution` entity and canonical ordering
//!   - `episode`: position tracking, episode metrics, ledger derivation
//!   - `trade_history`: `HistoricalTrade` aggregate, unit-of-work repository, statistics
//!   - `integrity`: store-versus-ledger checks
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `TradeLedgerPort`
//!   - `use_cases`: `IdentifyCompletedTrades`, `CalculateMetrics`, `SyncHistory`,
//!     `InitializeHistory`, `CheckIntegrity`, `RepairIntegrity`, `GetStatistics`
//!   - `dto`: Data transfer objects for API boundaries
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: in-memory and JSON-file ledger and store
//!   - `config`: Dependency injection container
//!
//! - **Config** / **Observability**: YAML configuration, tracing and metrics

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Tracing setup and metrics.
pub mod observability;

#[cfg(test)]
pub(crate) mod test_fixtures;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::episode::{Episode, EpisodeKey, EpisodeMetrics, EpisodeMetricsCalculator};
pub use domain::trade_history::{HistoricalTrade, TradeStatistics};
pub use domain::trade_ledger::{TradeExecution, TradeSide};

// Application re-exports
pub use application::JournalError;
pub use application::dto::{RepairOptions, SyncMode};

// Infrastructure re-exports
pub use infrastructure::config::{Container, JsonFileContainer};
