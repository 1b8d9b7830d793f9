//! Observability module for logging and metrics.
//!
//! Structured logs go through `tracing`; counters go through the
//! `metrics` facade.

mod metrics;
mod tracing;

pub use self::metrics::{
    record_data_quality_warning, record_integrity_check, record_repair_action, record_sync,
    record_sync_failure,
};
pub use self::tracing::{TracingConfig, TracingError, init_tracing};
