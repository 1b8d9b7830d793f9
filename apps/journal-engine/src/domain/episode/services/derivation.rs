//! Ledger-wide episode derivation.
//!
//! Groups the ledger per instrument, runs a [`PositionTracker`] over each
//! group and computes metrics for every closed episode.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::{EpisodeMetricsCalculator, PositionTracker};
use crate::domain::episode::value_objects::{DataQualityWarning, EpisodeMetrics};
use crate::domain::episode::{Episode, EpisodeKey};
use crate::domain::shared::{DomainError, ExecutionId, InstrumentCode, Quantity};
use crate::domain::trade_ledger::{TradeExecution, canonical_order};

/// A closed episode together with its metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedEpisode {
    /// The episode.
    pub episode: Episode,
    /// Its metrics.
    pub metrics: EpisodeMetrics,
}

impl DerivedEpisode {
    /// Natural key of the episode.
    #[must_use]
    pub fn key(&self) -> EpisodeKey {
        EpisodeKey::new(
            self.episode.instrument().clone(),
            self.metrics.buy_date,
            self.metrics.sell_date,
        )
    }
}

/// An episode whose metrics could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFailure {
    /// Instrument.
    pub instrument: InstrumentCode,
    /// Buy ids of the episode.
    pub buy_ids: Vec<ExecutionId>,
    /// Sell ids of the episode.
    pub sell_ids: Vec<ExecutionId>,
    /// Why it failed.
    pub error: DomainError,
}

/// Shares still held for an instrument at the end of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPosition {
    /// Instrument.
    pub instrument: InstrumentCode,
    /// Running position after the last execution.
    pub quantity: Quantity,
}

/// Everything learned from one pass over the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerDerivation {
    /// Closed episodes in canonical order.
    pub episodes: Vec<DerivedEpisode>,
    /// Episodes whose metrics failed.
    pub failures: Vec<EpisodeFailure>,
    /// Data-quality warnings from every tracker.
    pub warnings: Vec<DataQualityWarning>,
    /// Instruments with a trailing open position.
    pub open_positions: Vec<OpenPosition>,
    /// Non-corrected executions considered.
    pub execution_count: usize,
    /// Distinct instruments considered.
    pub instrument_count: usize,
}

/// Split a ledger into one canonically sorted group per instrument.
///
/// Corrected rows are dropped.
#[must_use]
pub fn group_by_instrument(
    executions: impl IntoIterator<Item = TradeExecution>,
) -> BTreeMap<InstrumentCode, Vec<TradeExecution>> {
    let mut groups: BTreeMap<InstrumentCode, Vec<TradeExecution>> = BTreeMap::new();
    for execution in executions {
        if execution.is_corrected() {
            continue;
        }
        groups
            .entry(execution.instrument().clone())
            .or_default()
            .push(execution);
    }
    for rows in groups.values_mut() {
        rows.sort_by(canonical_order);
    }
    groups
}

/// One position tracker per instrument, in instrument order.
pub fn track_ledger(
    executions: impl IntoIterator<Item = TradeExecution>,
) -> impl Iterator<Item = PositionTracker<std::vec::IntoIter<TradeExecution>>> {
    group_by_instrument(executions)
        .into_values()
        .map(PositionTracker::new)
}

/// Derive every closed episode of the ledger and compute its metrics.
#[must_use]
pub fn derive_episodes(
    executions: impl IntoIterator<Item = TradeExecution>,
    calculator: &EpisodeMetricsCalculator,
) -> LedgerDerivation {
    let groups = group_by_instrument(executions);
    let mut derivation = LedgerDerivation {
        execution_count: groups.values().map(Vec::len).sum(),
        instrument_count: groups.len(),
        ..LedgerDerivation::default()
    };

    for (instrument, rows) in groups {
        let mut tracker = PositionTracker::new(rows);
        for episode in tracker.by_ref() {
            match calculator.calculate_episode(&episode) {
                Ok(metrics) => derivation
                    .episodes
                    .push(DerivedEpisode { episode, metrics }),
                Err(error) => derivation.failures.push(EpisodeFailure {
                    instrument: instrument.clone(),
                    buy_ids: episode.buy_ids(),
                    sell_ids: episode.sell_ids(),
                    error,
                }),
            }
        }

        let position = tracker.running_position();
        if position.is_positive() {
            derivation.open_positions.push(OpenPosition {
                instrument: instrument.clone(),
                quantity: position,
            });
        }
        derivation.warnings.extend(tracker.into_warnings());
    }

    debug!(
        executions = derivation.execution_count,
        instruments = derivation.instrument_count,
        episodes = derivation.episodes.len(),
        warnings = derivation.warnings.len(),
        "Ledger derived"
    );
    derivation
}
