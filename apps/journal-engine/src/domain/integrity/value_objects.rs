//! Integrity report value objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::episode::EpisodeKey;
use crate::domain::shared::{ExecutionId, HistoricalTradeId, InstrumentCode, Quantity, Timestamp};

/// Overall outcome of an integrity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing found.
    Ok,
    /// Only warnings found.
    Warning,
    /// At least one error found.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Category of an integrity finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// More shares bought than sold for an instrument.
    OrphanedPosition,
    /// Stored metrics disagree with the referenced executions.
    Inconsistency,
    /// Several rows share one natural key.
    Duplicate,
    /// A stored row breaks a basic constraint.
    ConstraintViolation,
    /// Stored execution ids do not all resolve.
    InvalidReference,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OrphanedPosition => "orphaned_position",
            Self::Inconsistency => "inconsistency",
            Self::Duplicate => "duplicate",
            Self::ConstraintViolation => "constraint_violation",
            Self::InvalidReference => "invalid_reference",
        };
        f.write_str(s)
    }
}

/// One integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityIssue {
    /// Category.
    pub kind: IssueKind,
    /// Warning or error.
    pub severity: Severity,
    /// Instrument concerned.
    pub instrument: InstrumentCode,
    /// Row concerned, if the finding is about a stored trade.
    pub trade_id: Option<HistoricalTradeId>,
    /// Execution ids that do not resolve to an execution of their side.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_ids: Vec<ExecutionId>,
    /// Human-readable description.
    pub message: String,
}

impl IntegrityIssue {
    /// An error-level finding about a stored row.
    pub fn error(
        kind: IssueKind,
        instrument: InstrumentCode,
        trade_id: Option<HistoricalTradeId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            instrument,
            trade_id,
            missing_ids: Vec::new(),
            message: message.into(),
        }
    }

    /// A warning-level finding.
    pub fn warning(kind: IssueKind, instrument: InstrumentCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            instrument,
            trade_id: None,
            missing_ids: Vec::new(),
            message: message.into(),
        }
    }

    /// Attach unresolved execution ids.
    #[must_use]
    pub fn with_missing_ids(mut self, ids: Vec<ExecutionId>) -> Self {
        self.missing_ids = ids;
        self
    }
}

/// An instrument holding shares that were never sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedPosition {
    /// Instrument.
    pub instrument: InstrumentCode,
    /// Σ buy quantity.
    pub bought: Quantity,
    /// Σ sell quantity.
    pub sold: Quantity,
    /// bought - sold.
    pub open_quantity: Quantity,
}

/// Rows sharing a natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    /// Shared key.
    pub key: EpisodeKey,
    /// Member ids in ascending order.
    pub trade_ids: Vec<HistoricalTradeId>,
}

impl DuplicateGroup {
    /// The member that survives deduplication (lowest id).
    #[must_use]
    pub fn keeper(&self) -> Option<HistoricalTradeId> {
        self.trade_ids.first().copied()
    }

    /// Lowest id accepted by `usable`, or the lowest id when none is.
    pub fn keeper_where(
        &self,
        usable: impl Fn(HistoricalTradeId) -> bool,
    ) -> Option<HistoricalTradeId> {
        self.trade_ids
            .iter()
            .copied()
            .find(|&id| usable(id))
            .or_else(|| self.keeper())
    }

    /// Members other than `keeper`.
    pub fn redundant(
        &self,
        keeper: HistoricalTradeId,
    ) -> impl Iterator<Item = HistoricalTradeId> + '_ {
        self.trade_ids.iter().copied().filter(move |&id| id != keeper)
    }
}

/// Summary counts of a check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityStats {
    /// Non-corrected ledger executions.
    pub execution_count: usize,
    /// Distinct instruments in the ledger.
    pub instrument_count: usize,
    /// Rows in the store.
    pub historical_trade_count: usize,
    /// Episodes derivable from the ledger.
    pub episode_count: usize,
    /// Profitable rows in the store.
    pub win_count: usize,
    /// win_count / historical_trade_count.
    pub win_rate: Decimal,
    /// historical_trade_count / episode_count.
    pub coverage_ratio: Decimal,
    /// Instruments with unsold shares.
    pub orphaned_count: usize,
    /// Duplicate groups.
    pub duplicate_count: usize,
}

/// Result of an integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    /// No errors were found.
    pub is_valid: bool,
    /// Worst finding.
    pub severity: Severity,
    /// Error-level findings.
    pub issues: Vec<IntegrityIssue>,
    /// Warning-level findings.
    pub warnings: Vec<IntegrityIssue>,
    /// Instruments with unsold shares.
    pub orphaned_positions: Vec<OrphanedPosition>,
    /// Rows sharing a natural key.
    pub duplicates: Vec<DuplicateGroup>,
    /// Summary counts.
    pub stats: IntegrityStats,
    /// When the check ran.
    pub checked_at: Timestamp,
}

impl IntegrityReport {
    /// Assemble a report, deriving validity and severity from the findings.
    #[must_use]
    pub fn new(
        issues: Vec<IntegrityIssue>,
        warnings: Vec<IntegrityIssue>,
        orphaned_positions: Vec<OrphanedPosition>,
        duplicates: Vec<DuplicateGroup>,
        stats: IntegrityStats,
    ) -> Self {
        let severity = if !issues.is_empty() {
            Severity::Error
        } else if !warnings.is_empty() {
            Severity::Warning
        } else {
            Severity::Ok
        };
        Self {
            is_valid: issues.is_empty(),
            severity,
            issues,
            warnings,
            orphaned_positions,
            duplicates,
            stats,
            checked_at: Timestamp::now(),
        }
    }

    /// Number of error-level findings of a kind.
    #[must_use]
    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_alone_keep_report_valid() {
        let report = IntegrityReport::new(
            vec![],
            vec![IntegrityIssue::warning(
                IssueKind::OrphanedPosition,
                InstrumentCode::new("AAPL"),
                "10 shares open",
            )],
            vec![],
            vec![],
            IntegrityStats::default(),
        );
        assert!(report.is_valid);
        assert_eq!(report.severity, Severity::Warning);
    }

    #[test]
    fn errors_invalidate_report() {
        let report = IntegrityReport::new(
            vec![IntegrityIssue::error(
                IssueKind::InvalidReference,
                InstrumentCode::new("AAPL"),
                Some(HistoricalTradeId::new(1)),
                "missing",
            )],
            vec![],
            vec![],
            vec![],
            IntegrityStats::default(),
        );
        assert!(!report.is_valid);
        assert_eq!(report.severity, Severity::Error);
        assert_eq!(report.count_of(IssueKind::InvalidReference), 1);
    }

    #[test]
    fn duplicate_group_keeps_lowest_id() {
        let group = DuplicateGroup {
            key: EpisodeKey::new(
                InstrumentCode::new("AAPL"),
                Timestamp::parse("2024-01-01").unwrap(),
                Timestamp::parse("2024-01-02").unwrap(),
            ),
            trade_ids: vec![HistoricalTradeId::new(2), HistoricalTradeId::new(5)],
        };
        assert_eq!(group.keeper(), Some(HistoricalTradeId::new(2)));
        assert_eq!(group.keeper_where(|_| false), Some(HistoricalTradeId::new(2)));
        let redundant: Vec<_> = group.redundant(HistoricalTradeId::new(2)).collect();
        assert_eq!(redundant, vec![HistoricalTradeId::new(5)]);
    }

    #[test]
    fn duplicate_group_prefers_usable_member() {
        let group = DuplicateGroup {
            key: EpisodeKey::new(
                InstrumentCode::new("AAPL"),
                Timestamp::parse("2024-01-01").unwrap(),
                Timestamp::parse("2024-01-02").unwrap(),
            ),
            trade_ids: vec![
                HistoricalTradeId::new(1),
                HistoricalTradeId::new(2),
                HistoricalTradeId::new(3),
            ],
        };
        let keeper = group.keeper_where(|id| id.value() >= 2);
        assert_eq!(keeper, Some(HistoricalTradeId::new(2)));
        let redundant: Vec<_> = group.redundant(HistoricalTradeId::new(2)).collect();
        assert_eq!(redundant, vec![HistoricalTradeId::new(1), HistoricalTradeId::new(3)]);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Ok).unwrap(), "\"ok\"");
    }
}
