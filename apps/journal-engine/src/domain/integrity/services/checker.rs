//! Integrity Checker
//!
//! Read-only comparison of the trade history against the ledger. Every
//! check runs independently and every finding is reported.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::episode::{EpisodeKey, EpisodeMetrics, EpisodeMetricsCalculator, derive_episodes};
use crate::domain::integrity::value_objects::{
    DuplicateGroup, IntegrityIssue, IntegrityReport, IntegrityStats, IssueKind, OrphanedPosition,
};
use crate::domain::shared::{DomainError, ExecutionId, HistoricalTradeId, InstrumentCode, Quantity};
use crate::domain::trade_history::HistoricalTrade;
use crate::domain::trade_ledger::{TradeExecution, TradeSide};

/// Default tolerance when comparing stored and recomputed amounts.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Lookup of active executions by id.
#[derive(Debug)]
pub struct ExecutionIndex<'a> {
    by_id: HashMap<ExecutionId, &'a TradeExecution>,
}

/// Executions a stored row resolves to.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Resolved buys in stored order.
    pub buys: Vec<TradeExecution>,
    /// Resolved sells in stored order.
    pub sells: Vec<TradeExecution>,
    /// Ids with no active execution.
    pub missing: Vec<ExecutionId>,
    /// Ids whose execution is on the opposite side.
    pub wrong_side: Vec<ExecutionId>,
    /// Sides whose stored id list is empty.
    pub empty_sides: Vec<TradeSide>,
}

impl Resolution {
    /// Every stored id resolved to an execution of its side, and neither
    /// side is empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.wrong_side.is_empty() && self.empty_sides.is_empty()
    }

    /// Ids that do not resolve to an execution of their side.
    #[must_use]
    pub fn unresolved_ids(&self) -> Vec<ExecutionId> {
        self.missing.iter().chain(&self.wrong_side).copied().collect()
    }

    /// What keeps the row from resolving.
    #[must_use]
    pub fn describe(&self) -> String {
        let list = |ids: &[ExecutionId]| {
            ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        };
        let mut problems = Vec::new();
        if !self.missing.is_empty() {
            problems.push(format!("unresolved executions [{}]", list(&self.missing)));
        }
        if !self.wrong_side.is_empty() {
            problems.push(format!("executions on the wrong side [{}]", list(&self.wrong_side)));
        }
        for side in &self.empty_sides {
            problems.push(format!("no {side} executions"));
        }
        problems.join("; ")
    }
}

impl<'a> ExecutionIndex<'a> {
    /// Index the non-corrected executions.
    ///
    /// Corrected rows are not indexed, so a stored reference to one is
    /// reported as unresolved.
    #[must_use]
    pub fn new(executions: &'a [TradeExecution]) -> Self {
        let by_id = executions
            .iter()
            .filter(|e| !e.is_corrected())
            .map(|e| (e.id(), e))
            .collect();
        Self { by_id }
    }

    /// Resolve a row's buy and sell ids.
    #[must_use]
    pub fn resolve(&self, trade: &HistoricalTrade) -> Resolution {
        let mut resolution = Resolution::default();
        for (ids, side) in [
            (trade.buy_ids(), TradeSide::Buy),
            (trade.sell_ids(), TradeSide::Sell),
        ] {
            if ids.is_empty() {
                resolution.empty_sides.push(side);
            }
            for id in ids {
                match self.by_id.get(id) {
                    None => resolution.missing.push(*id),
                    Some(execution) if execution.side() != side => resolution.wrong_side.push(*id),
                    Some(execution) if side.is_buy() => resolution.buys.push((*execution).clone()),
                    Some(execution) => resolution.sells.push((*execution).clone()),
                }
            }
        }
        resolution
    }
}

/// Groups of rows that share a natural key, in key order.
#[must_use]
pub fn find_duplicates(trades: &[HistoricalTrade]) -> Vec<DuplicateGroup> {
    let mut by_key: BTreeMap<EpisodeKey, Vec<HistoricalTradeId>> = BTreeMap::new();
    for trade in trades {
        by_key.entry(trade.key()).or_default().push(trade.id());
    }
    by_key
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(key, mut trade_ids)| {
            trade_ids.sort_unstable();
            DuplicateGroup { key, trade_ids }
        })
        .collect()
}

/// Compares the trade history with the ledger.
#[derive(Debug, Clone, Copy)]
pub struct IntegrityChecker {
    epsilon: Decimal,
    calculator: EpisodeMetricsCalculator,
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON, EpisodeMetricsCalculator::default())
    }
}

impl IntegrityChecker {
    /// Create a checker with an amount tolerance.
    #[must_use]
    pub const fn new(epsilon: Decimal, calculator: EpisodeMetricsCalculator) -> Self {
        Self {
            epsilon,
            calculator,
        }
    }

    /// Amount tolerance.
    #[must_use]
    pub const fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Recompute a row's metrics from its resolved executions.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either side resolved to nothing.
    pub fn recompute(&self, resolution: &Resolution) -> Result<EpisodeMetrics, DomainError> {
        self.calculator.calculate(&resolution.buys, &resolution.sells)
    }

    /// Run every check.
    #[must_use]
    pub fn check(&self, executions: &[TradeExecution], trades: &[HistoricalTrade]) -> IntegrityReport {
        let index = ExecutionIndex::new(executions);
        let mut issues = Vec::new();

        for trade in trades {
            issues.extend(constraint_violations(trade));

            let resolution = index.resolve(trade);
            if resolution.is_complete() {
                issues.extend(self.consistency(trade, &resolution));
            } else {
                issues.push(
                    IntegrityIssue::error(
                        IssueKind::InvalidReference,
                        trade.instrument().clone(),
                        Some(trade.id()),
                        format!("trade {}: {}", trade.id(), resolution.describe()),
                    )
                    .with_missing_ids(resolution.unresolved_ids()),
                );
            }
        }

        let duplicates = find_duplicates(trades);
        for group in &duplicates {
            let ids: Vec<String> = group.trade_ids.iter().map(ToString::to_string).collect();
            issues.push(IntegrityIssue::error(
                IssueKind::Duplicate,
                group.key.instrument.clone(),
                group.keeper(),
                format!("{} rows share key {}: [{}]", ids.len(), group.key, ids.join(", ")),
            ));
        }

        let orphaned_positions = orphaned_positions(executions);
        let warnings: Vec<IntegrityIssue> = orphaned_positions
            .iter()
            .map(|p| {
                IntegrityIssue::warning(
                    IssueKind::OrphanedPosition,
                    p.instrument.clone(),
                    format!(
                        "{} shares bought, {} sold, {} still held",
                        p.bought, p.sold, p.open_quantity
                    ),
                )
            })
            .collect();

        let derivation = derive_episodes(executions.iter().cloned(), &self.calculator);
        let win_count = trades.iter().filter(|t| t.is_profitable()).count();
        let stats = IntegrityStats {
            execution_count: derivation.execution_count,
            instrument_count: derivation.instrument_count,
            historical_trade_count: trades.len(),
            episode_count: derivation.episodes.len(),
            win_count,
            win_rate: ratio(win_count, trades.len(), Decimal::ZERO),
            coverage_ratio: ratio(trades.len(), derivation.episodes.len(), Decimal::ONE),
            orphaned_count: orphaned_positions.len(),
            duplicate_count: duplicates.len(),
        };

        debug!(
            issues = issues.len(),
            warnings = warnings.len(),
            trades = trades.len(),
            "Integrity check finished"
        );
        IntegrityReport::new(issues, warnings, orphaned_positions, duplicates, stats)
    }

    fn consistency(&self, trade: &HistoricalTrade, resolution: &Resolution) -> Option<IntegrityIssue> {
        let message = match self.recompute(resolution) {
            Err(e) => format!("trade {} cannot be recomputed: {e}", trade.id()),
            Ok(metrics) => {
                let investment_gap = trade.total_investment().distance(metrics.total_investment);
                let return_gap = trade.total_return().distance(metrics.total_return);
                if investment_gap <= self.epsilon && return_gap <= self.epsilon {
                    return None;
                }
                format!(
                    "trade {} stores investment {} / return {}, executions give {} / {}",
                    trade.id(),
                    trade.total_investment(),
                    trade.total_return(),
                    metrics.total_investment,
                    metrics.total_return
                )
            }
        };
        Some(IntegrityIssue::error(
            IssueKind::Inconsistency,
            trade.instrument().clone(),
            Some(trade.id()),
            message,
        ))
    }
}

fn constraint_violations(trade: &HistoricalTrade) -> Vec<IntegrityIssue> {
    let mut problems = Vec::new();
    if !trade.total_investment().is_positive() {
        problems.push(format!("total investment {} is not positive", trade.total_investment()));
    }
    if trade.holding_days() < 0 {
        problems.push(format!("holding days {} is negative", trade.holding_days()));
    }
    if trade.sell_date() < trade.buy_date() {
        problems.push(format!(
            "sell date {} precedes buy date {}",
            trade.sell_date(),
            trade.buy_date()
        ));
    }
    problems
        .into_iter()
        .map(|p| {
            IntegrityIssue::error(
                IssueKind::ConstraintViolation,
                trade.instrument().clone(),
                Some(trade.id()),
                format!("trade {}: {p}", trade.id()),
            )
        })
        .collect()
}

fn orphaned_positions(executions: &[TradeExecution]) -> Vec<OrphanedPosition> {
    let mut totals: BTreeMap<InstrumentCode, (Quantity, Quantity)> = BTreeMap::new();
    for execution in executions.iter().filter(|e| !e.is_corrected()) {
        let entry = totals.entry(execution.instrument().clone()).or_default();
        match execution.side() {
            TradeSide::Buy => entry.0 += execution.quantity(),
            TradeSide::Sell => entry.1 += execution.quantity(),
        }
    }
    totals
        .into_iter()
        .filter(|(_, (bought, sold))| bought > sold)
        .map(|(instrument, (bought, sold))| OrphanedPosition {
            instrument,
            bought,
            sold,
            open_quantity: bought - sold,
        })
        .collect()
}

fn ratio(numerator: usize, denominator: usize, when_empty: Decimal) -> Decimal {
    if denominator == 0 {
        when_empty
    } else {
        Decimal::from(numerator) / Decimal::from(denominator)
    }
}
