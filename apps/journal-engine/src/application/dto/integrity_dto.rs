//! Integrity and repair DTOs

use serde::{Deserialize, Serialize};

use crate::domain::integrity::IntegrityReport;
use crate::domain::shared::{HistoricalTradeId, InstrumentCode};

/// Integrity report with headline counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReportDto {
    /// Full report.
    #[serde(flatten)]
    pub report: IntegrityReport,
    /// Instruments with unsold shares.
    pub orphaned_count: usize,
    /// Duplicate key groups.
    pub duplicate_count: usize,
}

impl From<IntegrityReport> for IntegrityReportDto {
    fn from(report: IntegrityReport) -> Self {
        Self {
            orphaned_count: report.orphaned_positions.len(),
            duplicate_count: report.duplicates.len(),
            report,
        }
    }
}

impl IntegrityReportDto {
    /// Whether the checked history is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.report.is_valid
    }
}

/// Which repairs to run.
///
/// Repairs always run in the order duplicates, references, inconsistencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairOptions {
    /// Keep the lowest-id row of each duplicate group.
    pub remove_duplicates: bool,
    /// Overwrite drifted metrics with recomputed values.
    pub fix_inconsistencies: bool,
    /// Delete rows whose execution ids do not all resolve.
    #[serde(alias = "fixInvalidReferences", alias = "fix_invalid_references")]
    pub update_references: bool,
}

impl RepairOptions {
    /// Every repair enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            remove_duplicates: true,
            fix_inconsistencies: true,
            update_references: true,
        }
    }

    /// At least one repair is enabled.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.remove_duplicates || self.fix_inconsistencies || self.update_references
    }
}

/// Kind of repair applied to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairActionKind {
    /// Row deleted as a redundant duplicate.
    RemovedDuplicate,
    /// Row deleted because its references did not resolve.
    RemovedInvalidReference,
    /// Row metrics overwritten.
    FixedInconsistency,
}

impl RepairActionKind {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RemovedDuplicate => "removed_duplicate",
            Self::RemovedInvalidReference => "removed_invalid_reference",
            Self::FixedInconsistency => "fixed_inconsistency",
        }
    }
}

/// One repair applied to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairActionDto {
    /// What was done.
    pub kind: RepairActionKind,
    /// Row affected.
    pub trade_id: HistoricalTradeId,
    /// Instrument of the row.
    pub instrument: InstrumentCode,
    /// Human-readable detail.
    pub detail: String,
}

/// Outcome of a repair call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReportDto {
    /// Options the repair ran with.
    pub options: RepairOptions,
    /// Every action taken, in execution order.
    pub actions: Vec<RepairActionDto>,
    /// Duplicate rows deleted.
    pub removed_duplicates: usize,
    /// Rows deleted for unresolved references.
    pub removed_invalid_references: usize,
    /// Rows whose metrics were rewritten.
    pub fixed_inconsistencies: usize,
    /// Fresh check after the repair committed.
    pub post_repair_check: IntegrityReportDto,
    /// The post-repair check is valid.
    pub success: bool,
}

impl RepairReportDto {
    /// Build a report, tallying actions by kind.
    #[must_use]
    pub fn new(
        options: RepairOptions,
        actions: Vec<RepairActionDto>,
        post_repair_check: IntegrityReportDto,
    ) -> Self {
        let count = |kind| actions.iter().filter(|a| a.kind == kind).count();
        Self {
            options,
            removed_duplicates: count(RepairActionKind::RemovedDuplicate),
            removed_invalid_references: count(RepairActionKind::RemovedInvalidReference),
            fixed_inconsistencies: count(RepairActionKind::FixedInconsistency),
            success: post_repair_check.is_valid(),
            actions,
            post_repair_check,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::integrity::{IntegrityStats, Severity};

    fn empty_report() -> IntegrityReport {
        IntegrityReport::new(vec![], vec![], vec![], vec![], IntegrityStats::default())
    }

    #[test]
    fn repair_options_accept_legacy_reference_flag() {
        let opts: RepairOptions =
            serde_json::from_str(r#"{"fix_invalid_references": true}"#).unwrap();
        assert!(opts.update_references);
        assert!(!opts.remove_duplicates);

        let opts: RepairOptions = serde_json::from_str(r#"{"fixInvalidReferences": true}"#).unwrap();
        assert!(opts.update_references);
    }

    #[test]
    fn repair_options_default_to_nothing() {
        let opts: RepairOptions = serde_json::from_str("{}").unwrap();
        assert!(!opts.any());
        assert!(RepairOptions::all().any());
    }

    #[test]
    fn integrity_dto_flattens_report() {
        let dto = IntegrityReportDto::from(empty_report());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["isValid"], serde_json::json!(true));
        assert_eq!(json["severity"], serde_json::json!("ok"));
        assert_eq!(json["orphanedCount"], serde_json::json!(0));
        assert_eq!(dto.report.severity, Severity::Ok);
    }

    #[test]
    fn repair_report_tallies_actions() {
        let action = |kind, id| RepairActionDto {
            kind,
            trade_id: HistoricalTradeId::new(id),
            instrument: InstrumentCode::new("AAPL"),
            detail: String::new(),
        };
        let report = RepairReportDto::new(
            RepairOptions::all(),
            vec![
                action(RepairActionKind::RemovedDuplicate, 2),
                action(RepairActionKind::RemovedDuplicate, 3),
                action(RepairActionKind::FixedInconsistency, 1),
            ],
            IntegrityReportDto::from(empty_report()),
        );
        assert_eq!(report.removed_duplicates, 2);
        assert_eq!(report.fixed_inconsistencies, 1);
        assert_eq!(report.removed_invalid_references, 0);
        assert!(report.success);
    }
}
