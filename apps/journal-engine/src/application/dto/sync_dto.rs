//! Sync DTOs

use serde::{Deserialize, Serialize};

use super::IntegrityReportDto;
use crate::domain::episode::{DataQualityWarning, EpisodeKey};
use crate::domain::shared::{ExecutionId, InstrumentCode, Timestamp};

/// Strategy used to reconcile the store with the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Delete every row, then recreate all derived episodes.
    FullRegenerate,
    /// Create missing rows and update rows whose metrics changed.
    Incremental,
    /// Create missing rows; leave existing rows untouched.
    CreateMissing,
}

impl SyncMode {
    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullRegenerate => "full_regenerate",
            Self::Incremental => "incremental",
            Self::CreateMissing => "create_missing",
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-episode failure collected during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncErrorDto {
    /// Instrument of the failed episode.
    pub instrument: InstrumentCode,
    /// Natural key, when the metrics were computed.
    pub key: Option<EpisodeKey>,
    /// Buy ids of the episode.
    pub buy_ids: Vec<ExecutionId>,
    /// Sell ids of the episode.
    pub sell_ids: Vec<ExecutionId>,
    /// What went wrong.
    pub message: String,
}

/// Outcome of a generate or sync call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReportDto {
    /// Strategy that ran.
    pub mode: SyncMode,
    /// Episodes derived from the ledger, including those whose metrics failed.
    pub identified: usize,
    /// Episodes looked up in the store.
    pub checked: usize,
    /// Rows inserted.
    pub created: usize,
    /// Rows updated in place.
    pub updated: usize,
    /// Episodes left untouched.
    pub skipped: usize,
    /// Episodes that failed.
    pub errored: usize,
    /// Failure details.
    pub errors: Vec<SyncErrorDto>,
    /// Rows deleted before recreation (full regenerate only).
    pub deleted: usize,
    /// Data-quality warnings raised while deriving.
    pub warnings: Vec<DataQualityWarning>,
    /// Latest store update before the call.
    pub watermark: Option<Timestamp>,
    /// Ledger executions updated after the watermark.
    pub new_executions: usize,
    /// No episode failed.
    pub success: bool,
}

impl SyncReportDto {
    /// Empty report for a mode.
    #[must_use]
    pub const fn new(mode: SyncMode) -> Self {
        Self {
            mode,
            identified: 0,
            checked: 0,
            created: 0,
            updated: 0,
            skipped: 0,
            errored: 0,
            errors: Vec::new(),
            deleted: 0,
            warnings: Vec::new(),
            watermark: None,
            new_executions: 0,
            success: true,
        }
    }

    /// Record a failure.
    pub fn push_error(&mut self, error: SyncErrorDto) {
        self.errors.push(error);
        self.errored = self.errors.len();
        self.success = false;
    }
}

/// Outcome of history initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeReportDto {
    /// Integrity check run before syncing.
    pub pre_check: IntegrityReportDto,
    /// Whether the store was regenerated from scratch.
    pub regenerated: bool,
    /// Sync outcome.
    pub sync: SyncReportDto,
    /// Sync succeeded.
    pub success: bool,
}
