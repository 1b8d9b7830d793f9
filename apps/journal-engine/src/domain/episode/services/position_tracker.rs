//! Position Tracker
//!
//! Walks one instrument's executions in canonical order and yields an
//! [`Episode`] every time the running position returns to zero.
//!
//! The tracker is a lazy iterator over its input: it is finite, and once
//! drained it cannot be restarted. Data-quality problems never abort the
//! walk; they are logged and collected in [`PositionTracker::warnings`].
//!
//! # Oversell policy
//!
//! A sell larger than the running position still belongs to the episode
//! (its id and full proceeds are recorded) but the position is clamped to
//! zero, so it never goes negative and the episode closes. An
//! [`WarningKind::Oversell`] warning records the excess.

use std::iter::{Fuse, FusedIterator};
use std::mem;

use tracing::{debug, warn};

use crate::domain::episode::Episode;
use crate::domain::episode::value_objects::{DataQualityWarning, WarningKind};
use crate::domain::shared::{InstrumentCode, Quantity};
use crate::domain::trade_ledger::{TradeExecution, TradeSide};

/// Lazy episode detector for a single instrument.
#[derive(Debug)]
pub struct PositionTracker<I>
where
    I: Iterator<Item = TradeExecution>,
{
    executions: Fuse<I>,
    instrument: Option<InstrumentCode>,
    instrument_name: String,
    running_position: Quantity,
    buys: Vec<TradeExecution>,
    sells: Vec<TradeExecution>,
    warnings: Vec<DataQualityWarning>,
}

impl<I> PositionTracker<I>
where
    I: Iterator<Item = TradeExecution>,
{
    /// Create a tracker over executions already in canonical order.
    ///
    /// The instrument is taken from the first execution; rows for any
    /// other instrument are skipped with a warning.
    pub fn new(executions: impl IntoIterator<Item = TradeExecution, IntoIter = I>) -> Self {
        Self {
            executions: executions.into_iter().fuse(),
            instrument: None,
            instrument_name: String::new(),
            running_position: Quantity::ZERO,
            buys: Vec::new(),
            sells: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Instrument being tracked (known once the first row is seen).
    #[must_use]
    pub const fn instrument(&self) -> Option<&InstrumentCode> {
        self.instrument.as_ref()
    }

    /// Shares currently held.
    #[must_use]
    pub const fn running_position(&self) -> Quantity {
        self.running_position
    }

    /// Buys of the episode that is still open.
    #[must_use]
    pub fn open_buys(&self) -> &[TradeExecution] {
        &self.buys
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Consume the tracker and return its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<DataQualityWarning> {
        self.warnings
    }

    fn apply(&mut self, execution: TradeExecution) -> Option<Episode> {
        if execution.is_corrected() {
            debug!(execution_id = %execution.id(), "Skipping corrected execution");
            return None;
        }

        match &self.instrument {
            None => self.instrument = Some(execution.instrument().clone()),
            Some(code) if code != execution.instrument() => {
                let code = code.clone();
                self.record(
                    WarningKind::InstrumentMismatch,
                    &execution,
                    format!(
                        "execution {} for {} ignored by tracker of {code}",
                        execution.id(),
                        execution.instrument()
                    ),
                );
                return None;
            }
            Some(_) => {}
        }
        if self.instrument_name.is_empty() {
            self.instrument_name = execution.instrument_name().to_string();
        }

        match execution.side() {
            TradeSide::Buy => {
                self.running_position += execution.quantity();
                self.buys.push(execution);
                None
            }
            TradeSide::Sell => self.apply_sell(execution),
        }
    }

    fn apply_sell(&mut self, execution: TradeExecution) -> Option<Episode> {
        if !self.running_position.is_positive() {
            self.record(
                WarningKind::SellWhileFlat,
                &execution,
                format!(
                    "sell {} of {} shares observed with no open position",
                    execution.id(),
                    execution.quantity()
                ),
            );
            return None;
        }

        let quantity = execution.quantity();
        if quantity > self.running_position {
            let excess = quantity - self.running_position;
            self.record(
                WarningKind::Oversell,
                &execution,
                format!(
                    "sell {} of {quantity} shares exceeds open position of {} by {excess}",
                    execution.id(),
                    self.running_position
                ),
            );
            self.running_position = Quantity::ZERO;
        } else {
            self.running_position -= quantity;
        }
        self.sells.push(execution);

        if self.running_position.is_zero() && !self.buys.is_empty() {
            return self.close_episode();
        }
        None
    }

    fn close_episode(&mut self) -> Option<Episode> {
        let instrument = self.instrument.clone()?;
        let buys = mem::take(&mut self.buys);
        let sells = mem::take(&mut self.sells);
        debug!(
            instrument = %instrument,
            buys = buys.len(),
            sells = sells.len(),
            "Episode closed"
        );
        Some(Episode::from_parts(
            instrument,
            self.instrument_name.clone(),
            buys,
            sells,
        ))
    }

    fn record(&mut self, kind: WarningKind, execution: &TradeExecution, message: String) {
        warn!(
            kind = %kind,
            instrument = %execution.instrument(),
            execution_id = %execution.id(),
            "{message}"
        );
        self.warnings.push(DataQualityWarning::new(
            kind,
            execution.instrument().clone(),
            Some(execution.id()),
            message,
        ));
    }
}

impl<I> Iterator for PositionTracker<I>
where
    I: Iterator<Item = TradeExecution>,
{
    type Item = Episode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(execution) = self.executions.next() {
            if let Some(episode) = self.apply(execution) {
                return Some(episode);
            }
        }
        None
    }
}

impl<I> FusedIterator for PositionTracker<I> where I: Iterator<Item = TradeExecution> {}
