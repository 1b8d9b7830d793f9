//! Trade Statistics
//!
//! Summary figures over the materialized trade history.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::shared::{DomainError, HistoricalTradeId, InstrumentCode, Money};
use crate::domain::trade_history::HistoricalTrade;

/// A single notable trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHighlight {
    /// Store id.
    pub id: HistoricalTradeId,
    /// Instrument.
    pub instrument: InstrumentCode,
    /// Return rate of the trade.
    pub return_rate: Decimal,
    /// Absolute return of the trade.
    pub total_return: Money,
}

impl From<&HistoricalTrade> for TradeHighlight {
    fn from(trade: &HistoricalTrade) -> Self {
        Self {
            id: trade.id(),
            instrument: trade.instrument().clone(),
            return_rate: trade.return_rate(),
            total_return: trade.total_return(),
        }
    }
}

/// Per-instrument breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentStatistics {
    /// Instrument.
    pub instrument: InstrumentCode,
    /// Completed trades.
    pub trades: usize,
    /// Profitable trades.
    pub wins: usize,
    /// Σ total_return.
    pub total_return: Money,
}

/// Aggregate statistics over completed trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStatistics {
    /// Completed trades.
    pub total_trades: usize,
    /// Trades with total_return > 0.
    pub profitable_trades: usize,
    /// Trades with total_return < 0.
    pub losing_trades: usize,
    /// profitable / total (0 with no trades).
    pub win_rate: Decimal,
    /// Σ total_investment.
    pub total_investment: Money,
    /// Σ total_return.
    pub total_return: Money,
    /// Σ total_return / Σ total_investment.
    pub overall_return_rate: Decimal,
    /// Mean of per-trade return rates.
    pub average_return_rate: Decimal,
    /// Mean holding period.
    pub average_holding_days: Decimal,
    /// Longest holding period.
    pub max_holding_days: Option<i64>,
    /// Shortest holding period.
    pub min_holding_days: Option<i64>,
    /// Highest return rate.
    pub best_trade: Option<TradeHighlight>,
    /// Lowest return rate.
    pub worst_trade: Option<TradeHighlight>,
    /// Breakdown per instrument, in instrument order.
    pub by_instrument: Vec<InstrumentStatistics>,
}

impl TradeStatistics {
    /// Compute statistics over `trades`.
    ///
    /// # Errors
    ///
    /// Returns error if a total overflows the decimal range.
    pub fn compute(trades: &[HistoricalTrade]) -> Result<Self, DomainError> {
        let total_trades = trades.len();
        let count = Decimal::from(total_trades);
        let profitable_trades = trades.iter().filter(|t| t.is_profitable()).count();
        let losing_trades = trades
            .iter()
            .filter(|t| t.total_return().is_negative())
            .count();

        let total_investment = trades
            .iter()
            .try_fold(Money::ZERO, |acc, t| acc.checked_add(t.total_investment()))?;
        let total_return = trades
            .iter()
            .try_fold(Money::ZERO, |acc, t| acc.checked_add(t.total_return()))?;
        let rate_sum = trades
            .iter()
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.return_rate()))
            .ok_or_else(|| DomainError::invalid("return_rate", "sum overflows the decimal range"))?;
        let days_sum: i64 = trades.iter().map(HistoricalTrade::holding_days).sum();

        let mean = |sum: Decimal| {
            if total_trades == 0 {
                Decimal::ZERO
            } else {
                sum / count
            }
        };

        let mut by_instrument: BTreeMap<InstrumentCode, InstrumentStatistics> = BTreeMap::new();
        for trade in trades {
            let entry = by_instrument
                .entry(trade.instrument().clone())
                .or_insert_with(|| InstrumentStatistics {
                    instrument: trade.instrument().clone(),
                    trades: 0,
                    wins: 0,
                    total_return: Money::ZERO,
                });
            entry.trades += 1;
            if trade.is_profitable() {
                entry.wins += 1;
            }
            entry.total_return = entry.total_return.checked_add(trade.total_return())?;
        }

        Ok(Self {
            total_trades,
            profitable_trades,
            losing_trades,
            win_rate: mean(Decimal::from(profitable_trades)),
            total_investment,
            total_return,
            overall_return_rate: total_return.ratio_to(total_investment)?,
            average_return_rate: mean(rate_sum),
            average_holding_days: mean(Decimal::from(days_sum)),
            max_holding_days: trades.iter().map(HistoricalTrade::holding_days).max(),
            min_holding_days: trades.iter().map(HistoricalTrade::holding_days).min(),
            best_trade: trades
                .iter()
                .max_by_key(|t| t.return_rate())
                .map(TradeHighlight::from),
            worst_trade: trades
                .iter()
                .min_by_key(|t| t.return_rate())
                .map(TradeHighlight::from),
            by_instrument: by_instrument.into_values().collect(),
        })
    }
}
