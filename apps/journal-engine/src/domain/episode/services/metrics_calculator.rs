//! Episode Metrics Calculator
//!
//! Computes the financial summary of a closed episode from its buy and
//! sell executions.

use rust_decimal::Decimal;

use crate::domain::episode::Episode;
use crate::domain::episode::value_objects::EpisodeMetrics;
use crate::domain::shared::{DomainError, Money, Quantity, Timestamp};
use crate::domain::trade_ledger::TradeExecution;

/// Trading days per year used to annualize daily returns.
pub const DEFAULT_ANNUALIZATION_DAYS: u32 = 250;

/// Pure metrics calculator for episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeMetricsCalculator {
    annualization_days: Decimal,
}

impl EpisodeMetricsCalculator {
    /// Create a calculator annualizing over `annualization_days` trading days.
    #[must_use]
    pub fn new(annualization_days: u32) -> Self {
        Self {
            annualization_days: Decimal::from(annualization_days),
        }
    }

    /// Trading days per year.
    #[must_use]
    pub const fn annualization_days(&self) -> Decimal {
        self.annualization_days
    }

    /// Compute metrics for an episode.
    ///
    /// # Errors
    ///
    /// See [`Self::calculate`].
    pub fn calculate_episode(&self, episode: &Episode) -> Result<EpisodeMetrics, DomainError> {
        self.calculate(episode.buys(), episode.sells())
    }

    /// Compute metrics for explicit buy and sell lists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyInput` if either list is empty and
    /// `DomainError::InvalidValue` if an amount overflows.
    pub fn calculate(
        &self,
        buys: &[TradeExecution],
        sells: &[TradeExecution],
    ) -> Result<EpisodeMetrics, DomainError> {
        let buy_date = earliest(buys).ok_or_else(|| DomainError::EmptyInput {
            field: "buys".to_string(),
        })?;
        let sell_date = latest(sells).ok_or_else(|| DomainError::EmptyInput {
            field: "sells".to_string(),
        })?;

        let total_investment = total_notional(buys)?;
        let total_revenue = total_notional(sells)?;
        let total_return = total_revenue.checked_sub(total_investment)?;
        let return_rate = total_return.ratio_to(total_investment)?;

        let total_buy_quantity: Quantity = buys.iter().map(TradeExecution::quantity).sum();
        let total_sell_quantity: Quantity = sells.iter().map(TradeExecution::quantity).sum();

        let holding_days = buy_date.calendar_days_until(sell_date);
        let daily_return_rate = if holding_days > 0 {
            return_rate / Decimal::from(holding_days)
        } else {
            Decimal::ZERO
        };
        let annualized_return_rate = daily_return_rate
            .checked_mul(self.annualization_days)
            .ok_or_else(|| {
                DomainError::invalid("annualized_return_rate", "overflows the decimal range")
            })?;

        Ok(EpisodeMetrics {
            total_investment,
            total_revenue,
            total_return,
            return_rate,
            buy_date,
            sell_date,
            holding_days,
            avg_buy_price: weighted_price(total_investment, total_buy_quantity),
            avg_sell_price: weighted_price(total_revenue, total_sell_quantity),
            daily_return_rate,
            annualized_return_rate,
            is_profitable: total_return.is_positive(),
            total_buy_quantity,
            total_sell_quantity,
        })
    }
}

impl Default for EpisodeMetricsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_ANNUALIZATION_DAYS)
    }
}

fn earliest(rows: &[TradeExecution]) -> Option<Timestamp> {
    rows.iter().map(TradeExecution::executed_at).min()
}

fn latest(rows: &[TradeExecution]) -> Option<Timestamp> {
    rows.iter().map(TradeExecution::executed_at).max()
}

fn total_notional(rows: &[TradeExecution]) -> Result<Money, DomainError> {
    rows.iter()
        .try_fold(Money::ZERO, |total, row| total.checked_add(row.notional()?))
}

fn weighted_price(notional: Money, quantity: Quantity) -> Money {
    if quantity.is_zero() {
        return Money::ZERO;
    }
    Money::new(notional.amount() / Decimal::from(quantity.shares()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{ExecutionId, InstrumentCode};
    use crate::domain::trade_ledger::{NewTradeExecution, TradeSide};
    use crate::test_fixtures::{buy, reference_round_trip, sell};
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn reference_metrics() -> EpisodeMetrics {
        let rows = reference_round_trip();
        let (buys, sells) = rows.split_at(2);
        EpisodeMetricsCalculator::default()
            .calculate(buys, sells)
            .unwrap()
    }

    #[test]
    fn reference_round_trip_totals() {
        let m = reference_metrics();
        assert_eq!(m.total_investment, Money::from_i64(3400));
        assert_eq!(m.total_revenue, Money::from_i64(4350));
        assert_eq!(m.total_return, Money::from_i64(950));
        assert_eq!(m.total_buy_quantity, Quantity::new(300));
        assert_eq!(m.total_sell_quantity, Quantity::new(300));
        assert!(m.is_profitable);
    }

    #[test]
    fn reference_round_trip_rates() {
        let m = reference_metrics();
        let expected = dec!(950) / dec!(3400);
        assert!((m.return_rate - expected).abs() < dec!(0.000000001));
        assert_eq!(m.return_rate.round_dp(4), dec!(0.2794));
        assert_eq!(m.holding_days, 9);
        assert_eq!(m.daily_return_rate, m.return_rate / dec!(9));
        assert_eq!(m.annualized_return_rate, m.daily_return_rate * dec!(250));
    }

    #[test]
    fn reference_round_trip_average_prices() {
        let m = reference_metrics();
        assert_eq!(m.avg_sell_price, Money::new(dec!(14.5)));
        assert_eq!(m.avg_buy_price.round(), Money::new(dec!(11.33)));
    }

    #[test]
    fn dates_are_min_buy_and_max_sell() {
        let m = EpisodeMetricsCalculator::default()
            .calculate(
                &[
                    buy(2, "AAPL", 5, 10, "2024-03-04"),
                    buy(1, "AAPL", 5, 10, "2024-03-01"),
                ],
                &[
                    sell(4, "AAPL", 5, 11, "2024-03-09"),
                    sell(3, "AAPL", 5, 11, "2024-03-07"),
                ],
            )
            .unwrap();
        assert_eq!(m.buy_date, Timestamp::parse("2024-03-01").unwrap());
        assert_eq!(m.sell_date, Timestamp::parse("2024-03-09").unwrap());
        assert_eq!(m.holding_days, 8);
    }

    #[test]
    fn same_day_round_trip_has_zero_daily_rate() {
        let m = EpisodeMetricsCalculator::default()
            .calculate(
                &[buy(1, "AAPL", 10, 10, "2024-01-01")],
                &[sell(2, "AAPL", 10, 12, "2024-01-01")],
            )
            .unwrap();
        assert_eq!(m.holding_days, 0);
        assert_eq!(m.daily_return_rate, Decimal::ZERO);
        assert_eq!(m.annualized_return_rate, Decimal::ZERO);
        assert_eq!(m.return_rate, dec!(0.2));
    }

    #[test_case(12, true ; "gain")]
    #[test_case(10, false ; "flat")]
    #[test_case(8, false ; "loss")]
    fn profitability_follows_total_return(sell_price: i64, profitable: bool) {
        let m = EpisodeMetricsCalculator::default()
            .calculate(
                &[buy(1, "AAPL", 10, 10, "2024-01-01")],
                &[sell(2, "AAPL", 10, sell_price, "2024-01-03")],
            )
            .unwrap();
        assert_eq!(m.is_profitable, profitable);
    }

    #[test]
    fn empty_buys_fail() {
        let err = EpisodeMetricsCalculator::default()
            .calculate(&[], &[sell(2, "AAPL", 10, 12, "2024-01-01")])
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("buys"));
    }

    #[test]
    fn empty_sells_fail() {
        let err = EpisodeMetricsCalculator::default()
            .calculate(&[buy(1, "AAPL", 10, 10, "2024-01-01")], &[])
            .unwrap_err();
        assert!(err.to_string().contains("sells"));
    }

    #[test]
    fn overflowing_notional_fails() {
        let huge = TradeExecution::new(NewTradeExecution {
            id: ExecutionId::new(1),
            instrument: InstrumentCode::new("AAPL"),
            instrument_name: String::new(),
            side: TradeSide::Buy,
            price: Money::new(Decimal::MAX),
            quantity: Quantity::new(2),
            executed_at: Timestamp::parse("2024-01-01").unwrap(),
        })
        .unwrap();
        let err = EpisodeMetricsCalculator::default()
            .calculate(&[huge], &[sell(2, "AAPL", 2, 12, "2024-01-02")])
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn custom_annualization() {
        let calculator = EpisodeMetricsCalculator::new(365);
        let m = calculator
            .calculate(
                &[buy(1, "AAPL", 10, 10, "2024-01-01")],
                &[sell(2, "AAPL", 10, 11, "2024-01-02")],
            )
            .unwrap();
        assert_eq!(m.annualized_return_rate, dec!(0.1) * dec!(365));
    }
}
