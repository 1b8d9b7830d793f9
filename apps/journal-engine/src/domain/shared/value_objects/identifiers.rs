//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up execution ids with historical trade ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_numeric_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new identifier from its numeric value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the inner numeric value.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// The identifier following this one.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_numeric_id!(ExecutionId, "Ledger identifier of a single buy/sell execution.");
define_numeric_id!(
    HistoricalTradeId,
    "Store identifier of a materialized completed trade."
);

/// Instrument (stock) code, e.g. `005930` or `AAPL`.
///
/// Codes are trimmed and upper-cased so that ledger rows and store rows
/// compare equal regardless of how they were entered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentCode(String);

impl InstrumentCode {
    /// Create a normalized instrument code.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_uppercase())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the code is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstrumentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InstrumentCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstrumentCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for InstrumentCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_id_ordering() {
        assert!(ExecutionId::new(1) < ExecutionId::new(2));
        assert_eq!(ExecutionId::new(4).next(), ExecutionId::new(5));
    }

    #[test]
    fn ids_display_as_numbers() {
        assert_eq!(HistoricalTradeId::new(42).to_string(), "42");
    }

    #[test]
    fn id_serde_is_transparent() {
        let json = serde_json::to_string(&ExecutionId::new(17)).unwrap();
        assert_eq!(json, "17");
        let parsed: ExecutionId = serde_json::from_str("17").unwrap();
        assert_eq!(parsed.value(), 17);
    }

    #[test]
    fn instrument_code_is_normalized() {
        let code = InstrumentCode::new("  aapl ");
        assert_eq!(code.as_str(), "AAPL");
        assert_eq!(code, InstrumentCode::from("AAPL"));
    }

    #[test]
    fn blank_instrument_code_is_empty() {
        assert!(InstrumentCode::new("   ").is_empty());
    }
}
