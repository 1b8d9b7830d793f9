//! Domain Layer
//!
//! Pure business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Entities and Value Objects**: Executions, episodes, materialized trades
//! - **Domain Services**: Position tracking, metrics, integrity checks
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`trade_ledger`]: The read-only execution log
//! - [`episode`]: Round-trip detection and metrics
//! - [`trade_history`]: The derived store of completed trades
//! - [`integrity`]: Drift detection between ledger and history

pub mod episode;
pub mod integrity;
pub mod shared;
pub mod trade_history;
pub mod trade_ledger;
