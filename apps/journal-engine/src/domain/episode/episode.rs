//! Episode value type.

use crate::domain::shared::{DomainError, ExecutionId, InstrumentCode, Timestamp};
use crate::domain::trade_ledger::{TradeExecution, TradeSide};

/// A closed round-trip: every buy and sell between two flat points of a
/// single instrument, in ledger order.
///
/// Episodes are transient. They are recomputed from the ledger on every
/// derivation and never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    instrument: InstrumentCode,
    instrument_name: String,
    buys: Vec<TradeExecution>,
    sells: Vec<TradeExecution>,
}

impl Episode {
    /// Build an episode from explicit buy and sell lists.
    ///
    /// # Errors
    ///
    /// Returns a validation error if either list is empty, a row is on the
    /// wrong side, or the rows span more than one instrument.
    pub fn new(buys: Vec<TradeExecution>, sells: Vec<TradeExecution>) -> Result<Self, DomainError> {
        let Some(first) = buys.first() else {
            return Err(DomainError::EmptyInput {
                field: "buys".to_string(),
            });
        };
        if sells.is_empty() {
            return Err(DomainError::EmptyInput {
                field: "sells".to_string(),
            });
        }
        let instrument = first.instrument().clone();
        let instrument_name = first.instrument_name().to_string();

        for (rows, side) in [(&buys, TradeSide::Buy), (&sells, TradeSide::Sell)] {
            for row in rows {
                if row.side() != side {
                    return Err(DomainError::invalid(
                        "side",
                        format!("execution {} is not a {side}", row.id()),
                    ));
                }
                if row.instrument() != &instrument {
                    return Err(DomainError::invalid(
                        "instrument",
                        format!(
                            "execution {} belongs to {}, episode is {instrument}",
                            row.id(),
                            row.instrument()
                        ),
                    ));
                }
            }
        }

        Ok(Self::from_parts(instrument, instrument_name, buys, sells))
    }

    /// Assemble an episode from lists already known to be consistent.
    pub(crate) const fn from_parts(
        instrument: InstrumentCode,
        instrument_name: String,
        buys: Vec<TradeExecution>,
        sells: Vec<TradeExecution>,
    ) -> Self {
        Self {
            instrument,
            instrument_name,
            buys,
            sells,
        }
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

    /// Buys in ledger order.
    #[must_use]
    pub fn buys(&self) -> &[TradeExecution] {
        &self.buys
    }

    /// Sells in ledger order.
    #[must_use]
    pub fn sells(&self) -> &[TradeExecution] {
        &self.sells
    }

    /// Ids of the buys in ledger order.
    #[must_use]
    pub fn buy_ids(&self) -> Vec<ExecutionId> {
        self.buys.iter().map(TradeExecution::id).collect()
    }

    /// Ids of the sells in ledger order.
    #[must_use]
    pub fn sell_ids(&self) -> Vec<ExecutionId> {
        self.sells.iter().map(TradeExecution::id).collect()
    }

    /// Timestamp of the last execution in the episode.
    #[must_use]
    pub fn closed_at(&self) -> Option<Timestamp> {
        self.sells.iter().map(TradeExecution::executed_at).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{buy, sell};

    #[test]
    fn episode_requires_buys() {
        let err = Episode::new(vec![], vec![sell(2, "AAPL", 10, 15, "2024-01-05")]).unwrap_err();
        assert_eq!(
            err,
            DomainError::EmptyInput {
                field: "buys".to_string()
            }
        );
    }

    #[test]
    fn episode_requires_sells() {
        let err = Episode::new(vec![buy(1, "AAPL", 10, 10, "2024-01-01")], vec![]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn episode_rejects_mixed_instruments() {
        let err = Episode::new(
            vec![buy(1, "AAPL", 10, 10, "2024-01-01")],
            vec![sell(2, "MSFT", 10, 15, "2024-01-05")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("MSFT"));
    }

    #[test]
    fn episode_rejects_wrong_side() {
        let err = Episode::new(
            vec![buy(1, "AAPL", 10, 10, "2024-01-01")],
            vec![buy(2, "AAPL", 10, 15, "2024-01-05")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a sell"));
    }

    #[test]
    fn episode_exposes_ids_in_order() {
        let episode = Episode::new(
            vec![
                buy(1, "AAPL", 100, 10, "2024-01-01"),
                buy(2, "AAPL", 200, 12, "2024-01-02"),
            ],
            vec![sell(3, "AAPL", 300, 15, "2024-01-05")],
        )
        .unwrap();
        assert_eq!(episode.buy_ids(), vec![ExecutionId::new(1), ExecutionId::new(2)]);
        assert_eq!(episode.sell_ids(), vec![ExecutionId::new(3)]);
        assert_eq!(
            episode.closed_at(),
            Some(Timestamp::parse("2024-01-05").unwrap())
        );
    }
}
