//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod calculate_metrics;
mod check_integrity;
mod get_statistics;
mod identify_completed_trades;
mod initialize_history;
mod repair_integrity;
mod sync_history;

pub use calculate_metrics::CalculateMetricsUseCase;
pub use check_integrity::CheckIntegrityUseCase;
pub use get_statistics::GetStatisticsUseCase;
pub use identify_completed_trades::IdentifyCompletedTradesUseCase;
pub use initialize_history::InitializeHistoryUseCase;
pub use repair_integrity::RepairIntegrityUseCase;
pub use sync_history::SyncHistoryUseCase;

use crate::domain::episode::DataQualityWarning;
use crate::observability::record_data_quality_warning;

/// Count data-quality warnings. The tracker has already logged them.
fn record_warnings(warnings: &[DataQualityWarning]) {
    for warning in warnings {
        record_data_quality_warning(&warning.kind.to_string());
    }
}
