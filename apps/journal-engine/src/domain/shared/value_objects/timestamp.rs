//! Timestamp value object for temporal data.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A UTC timestamp for executions and audit fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse from an RFC 3339 string or a plain `YYYY-MM-DD` date
    /// (interpreted as midnight UTC).
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is neither.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|date| Self(date.and_time(NaiveTime::MIN).and_utc()))
            .map_err(|e| DomainError::invalid("timestamp", format!("'{s}': {e}")))
    }

    /// Get the inner DateTime<Utc>.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Calendar date (UTC) of this timestamp.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Format as ISO 8601 / RFC 3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Number of calendar days from `self` to `later`.
    ///
    /// Negative when `later` falls on an earlier date.
    #[must_use]
    pub fn calendar_days_until(&self, later: Self) -> i64 {
        (later.date() - self.date()).num_days()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parse_rfc3339() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-19T12:00:00+00:00");
    }

    #[test]
    fn timestamp_parse_plain_date() {
        let ts = Timestamp::parse("2024-03-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn timestamp_parse_invalid_is_validation_error() {
        let err = Timestamp::parse("not-a-date").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn timestamp_ordering() {
        let ts1 = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        let ts2 = Timestamp::parse("2026-01-19T13:00:00Z").unwrap();
        assert!(ts1 < ts2);
    }

    #[test]
    fn calendar_days_ignore_time_of_day() {
        let buy = Timestamp::parse("2024-01-01T23:59:00Z").unwrap();
        let sell = Timestamp::parse("2024-01-02T00:01:00Z").unwrap();
        assert_eq!(buy.calendar_days_until(sell), 1);
        assert_eq!(sell.calendar_days_until(buy), -1);
    }

    #[test]
    fn timestamp_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }
}
