//! TradeExecution entity.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::side::TradeSide;
use crate::domain::shared::{
    DomainError, ExecutionId, InstrumentCode, Money, Quantity, Timestamp,
};

/// Command for recording a new execution.
#[derive(Debug, Clone)]
pub struct NewTradeExecution {
    /// Ledger id.
    pub id: ExecutionId,
    /// Instrument code.
    pub instrument: InstrumentCode,
    /// Instrument display name.
    pub instrument_name: String,
    /// Buy or sell.
    pub side: TradeSide,
    /// Execution price per share.
    pub price: Money,
    /// Shares executed.
    pub quantity: Quantity,
    /// When the execution happened.
    pub executed_at: Timestamp,
}

/// A single buy or sell execution from the ledger.
///
/// Executions are never edited in place: a correction is recorded as a
/// new row and the original is flagged with `is_corrected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeExecution {
    id: ExecutionId,
    instrument: InstrumentCode,
    #[serde(default)]
    instrument_name: String,
    side: TradeSide,
    price: Money,
    quantity: Quantity,
    executed_at: Timestamp,
    #[serde(default)]
    is_corrected: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl TradeExecution {
    /// Create a validated execution.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank instrument, a non-positive
    /// price or a non-positive quantity.
    pub fn new(command: NewTradeExecution) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        let execution = Self {
            id: command.id,
            instrument: command.instrument,
            instrument_name: command.instrument_name,
            side: command.side,
            price: command.price,
            quantity: command.quantity,
            executed_at: command.executed_at,
            is_corrected: false,
            created_at: now,
            updated_at: now,
        };
        execution.validate()?;
        Ok(execution)
    }

    /// Re-check invariants (used after deserializing external rows).
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first broken field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.instrument.is_empty() {
            return Err(DomainError::invalid(
                "instrument",
                format!("execution {} has no instrument code", self.id),
            ));
        }
        self.price.validate_as_price()?;
        self.quantity.validate_for_execution()?;
        Ok(())
    }

    /// Flag this execution as superseded by a correction.
    #[must_use]
    pub fn corrected(mut self) -> Self {
        self.is_corrected = true;
        self.updated_at = Timestamp::now();
        self
    }

    /// Ledger id.
    #[must_use]
    pub const fn id(&self) -> ExecutionId {
        self.id
    }

    /// Instrument code.
    #[must_use]
    pub const fn instrument(&self) -> &InstrumentCode {
        &self.instrument
    }

    /// Instrument display name.
    #[must_use]
    pub fn instrument_name(&self) -> &str {
        &self.instrument_name
    }

    /// Buy or sell.
    #[must_use]
    pub const fn side(&self) -> TradeSide {
        self.side
    }

    /// Execution price per share.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.price
    }

    /// Shares executed.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Price × quantity.
    ///
    /// # Errors
    ///
    /// Returns error if the product overflows.
    pub fn notional(&self) -> Result<Money, DomainError> {
        self.price.checked_notional(self.quantity)
    }

    /// Execution time.
    #[must_use]
    pub const fn executed_at(&self) -> Timestamp {
        self.executed_at
    }

    /// Whether this row has been superseded.
    #[must_use]
    pub const fn is_corrected(&self) -> bool {
        self.is_corrected
    }

    /// Row creation time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Row update time.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Compare two executions by (instrument, timestamp, id).
///
/// The id tiebreaker keeps episode derivation reproducible when several
/// executions share a timestamp.
#[must_use]
pub fn canonical_order(a: &TradeExecution, b: &TradeExecution) -> Ordering {
    a.instrument
        .cmp(&b.instrument)
        .then_with(|| a.executed_at.cmp(&b.executed_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort executions into canonical order in place.
pub fn sort_canonical(executions: &mut [TradeExecution]) {
    executions.sort_by(canonical_order);
}
