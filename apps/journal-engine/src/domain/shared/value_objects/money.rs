//! Money value object for currency amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use super::Quantity;
use crate::domain::shared::DomainError;

/// A monetary amount in the account currency.
///
/// Represented as a Decimal for precise financial calculations.
/// Always uses 2 decimal places for display (but internal precision is higher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from a whole amount.
    #[must_use]
    pub fn from_i64(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }

    /// Get the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Round to 2 decimal places.
    #[must_use]
    pub fn round(&self) -> Self {
        Self(self.0.round_dp(2))
    }

    /// Absolute difference from another amount.
    #[must_use]
    pub fn distance(&self, other: Self) -> Decimal {
        (self.0 - other.0).abs()
    }

    /// Ratio of this amount to `denominator`, or zero when the denominator is zero.
    ///
    /// # Errors
    ///
    /// Returns error if the quotient does not fit in a Decimal.
    pub fn ratio_to(&self, denominator: Self) -> Result<Decimal, DomainError> {
        if denominator.is_zero() {
            return Ok(Decimal::ZERO);
        }
        self.0
            .checked_div(denominator.0)
            .ok_or_else(|| overflow("ratio"))
    }

    /// Price × quantity.
    ///
    /// # Errors
    ///
    /// Returns error if the product does not fit in a Decimal.
    pub fn checked_notional(self, quantity: Quantity) -> Result<Self, DomainError> {
        self.0
            .checked_mul(Decimal::from(quantity.shares()))
            .map(Self)
            .ok_or_else(|| overflow("notional"))
    }

    /// Sum of two amounts.
    ///
    /// # Errors
    ///
    /// Returns error on Decimal overflow.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| overflow("sum"))
    }

    /// Difference of two amounts.
    ///
    /// # Errors
    ///
    /// Returns error on Decimal overflow.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| overflow("difference"))
    }

    /// Check that this is a usable execution price.
    ///
    /// # Errors
    ///
    /// Returns error if the price is zero or negative.
    pub fn validate_as_price(&self) -> Result<(), DomainError> {
        if self.0 <= Decimal::ZERO {
            return Err(DomainError::invalid("price", "Price must be positive"));
        }
        Ok(())
    }
}

fn overflow(what: &str) -> DomainError {
    DomainError::invalid("amount", format!("{what} overflows the decimal range"))
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_display_pads_to_cents() {
        let m = Money::new(dec!(150.5));
        assert_eq!(format!("{m}"), "150.50");
    }

    #[test]
    fn money_times_quantity() {
        let notional = Money::from_i64(12).checked_notional(Quantity::new(200)).unwrap();
        assert_eq!(notional, Money::from_i64(2400));
    }

    #[test]
    fn overflow_is_an_error() {
        let max = Money::new(Decimal::MAX);
        assert!(max.checked_notional(Quantity::new(2)).unwrap_err().is_validation());
        assert!(max.checked_add(Money::from_i64(1)).is_err());
        assert!((-max).checked_sub(Money::from_i64(1)).is_err());
        assert!(max.ratio_to(Money::new(dec!(0.001))).is_err());
    }

    #[test]
    fn money_sum() {
        let total: Money = [Money::from_i64(1000), Money::from_i64(2400)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_i64(3400));
    }

    #[test]
    fn money_ratio_guards_zero() {
        assert_eq!(Money::from_i64(5).ratio_to(Money::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(Money::from_i64(5).ratio_to(Money::from_i64(10)).unwrap(), dec!(0.5));
    }

    #[test]
    fn money_distance_is_absolute() {
        assert_eq!(
            Money::from_i64(3).distance(Money::from_i64(5)),
            Decimal::from(2)
        );
    }

    #[test]
    fn money_price_validation() {
        assert!(Money::from_i64(10).validate_as_price().is_ok());
        assert!(Money::ZERO.validate_as_price().is_err());
        assert!(Money::from_i64(-1).validate_as_price().is_err());
    }

    #[test]
    fn money_ordering() {
        assert!(Money::from_i64(1) < Money::from_i64(2));
        assert!(Money::from_i64(-1).is_negative());
        assert!((-Money::from_i64(1)).is_negative());
    }

    #[test]
    fn money_serde_roundtrip() {
        let m = Money::new(dec!(123.45));
        let json = serde_json::to_string(&m).unwrap();
        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, m);
    }
}
