//! Natural identity key of a completed episode.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{InstrumentCode, Timestamp};

/// (instrument, buy_date, sell_date). Expected to be unique in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeKey {
    /// Instrument code.
    pub instrument: InstrumentCode,
    /// Earliest buy timestamp.
    pub buy_date: Timestamp,
    /// Latest sell timestamp.
    pub sell_date: Timestamp,
}

impl EpisodeKey {
    /// Create a key.
    #[must_use]
    pub const fn new(instrument: InstrumentCode, buy_date: Timestamp, sell_date: Timestamp) -> Self {
        Self {
            instrument,
            buy_date,
            sell_date,
        }
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.instrument,
            self.buy_date.date(),
            self.sell_date.date()
        )
    }
}
