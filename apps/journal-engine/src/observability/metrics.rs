//! Metrics for the journal engine.
//!
//! Counters and gauges are emitted through the `metrics` facade. Without
//! an installed recorder every call is a no-op, so library users pay
//! nothing unless their host process exports them.

use metrics::{counter, gauge, histogram};

// ============================================================================
// Sync Metrics
// ============================================================================

/// Record a finished generate/sync run.
///
/// # Arguments
///
/// * `mode` - Sync mode label (e.g. "incremental")
/// * `created` / `updated` / `errored` - Row outcome counts
/// * `duration_seconds` - Wall time of the run
pub fn record_sync(mode: &str, created: usize, updated: usize, errored: usize, duration_seconds: f64) {
    let status = if errored == 0 { "success" } else { "partial" };
    counter!(
        "journal_sync_runs_total",
        "mode" => mode.to_string(),
        "status" => status
    )
    .increment(1);
    counter!("journal_sync_created_total", "mode" => mode.to_string()).increment(created as u64);
    counter!("journal_sync_updated_total", "mode" => mode.to_string()).increment(updated as u64);
    counter!("journal_sync_errors_total", "mode" => mode.to_string()).increment(errored as u64);
    histogram!("journal_sync_duration_seconds", "mode" => mode.to_string()).record(duration_seconds);
}

/// Record a sync call aborted before commit.
pub fn record_sync_failure(mode: &str) {
    counter!(
        "journal_sync_runs_total",
        "mode" => mode.to_string(),
        "status" => "failed"
    )
    .increment(1);
}

/// Record data-quality warnings raised while deriving episodes.
///
/// # Arguments
///
/// * `kind` - Warning kind (e.g. "sell_while_flat", "oversell")
pub fn record_data_quality_warning(kind: &str) {
    counter!("journal_data_quality_warnings_total", "kind" => kind.to_string()).increment(1);
}

// ============================================================================
// Integrity Metrics
// ============================================================================

/// Record an integrity check.
///
/// # Arguments
///
/// * `severity` - Overall severity ("ok", "warning", "error")
/// * `issues` - Error-level findings
/// * `coverage_ratio` - Store rows per derived episode
pub fn record_integrity_check(severity: &str, issues: usize, coverage_ratio: f64) {
    counter!(
        "journal_integrity_checks_total",
        "severity" => severity.to_string()
    )
    .increment(1);
    gauge!("journal_integrity_issues").set(issues as f64);
    gauge!("journal_integrity_coverage_ratio").set(coverage_ratio);
}

/// Record a repair action applied to one row.
///
/// # Arguments
///
/// * `kind` - Action kind (e.g. "removed_duplicate")
pub fn record_repair_action(kind: &str) {
    counter!("journal_integrity_repairs_total", "kind" => kind.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_noop() {
        record_sync("incremental", 1, 2, 0, 0.01);
        record_sync_failure("full_regenerate");
        record_data_quality_warning("oversell");
        record_integrity_check("ok", 0, 1.0);
        record_repair_action("removed_duplicate");
    }
}
