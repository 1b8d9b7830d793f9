//! Quantity value object for share counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::domain::shared::DomainError;

/// A whole number of shares.
///
/// Signed so that it can also carry a running position; execution
/// quantities are always validated to be positive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Create a new Quantity.
    #[must_use]
    pub const fn new(shares: i64) -> Self {
        Self(shares)
    }

    /// Zero quantity.
    pub const ZERO: Self = Self(0);

    /// Number of shares.
    #[must_use]
    pub const fn shares(&self) -> i64 {
        self.0
    }

    /// Returns true if this quantity is positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns true if this quantity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Validate quantity for an execution.
    ///
    /// # Errors
    ///
    /// Returns error if quantity is zero or negative.
    pub fn validate_for_execution(&self) -> Result<(), DomainError> {
        if self.0 <= 0 {
            return Err(DomainError::invalid(
                "quantity",
                "Execution quantity must be positive",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, q| acc + q)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
