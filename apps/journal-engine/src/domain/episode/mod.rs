//! Episode Bounded Context
//!
//! Turns the chronological execution log of one instrument into closed
//! round-trip episodes and computes their financial metrics.
//!
//! # Key Concepts
//!
//! - **Episode**: One full accumulation and liquidation of a position,
//!   bounded by the running position leaving zero and returning to it
//! - **EpisodeKey**: The natural identity (instrument, buy_date, sell_date)
//! - **Data-quality warnings**: Sells observed while flat, oversells and
//!   foreign-instrument rows are reported, never raised

pub mod episode;
pub mod key;
pub mod services;
pub mod value_objects;

pub use episode::Episode;
pub use key::EpisodeKey;
pub use services::{
    DerivedEpisode, EpisodeFailure, EpisodeMetricsCalculator, LedgerDerivation, OpenPosition,
    PositionTracker, derive_episodes, group_by_instrument, track_ledger,
};
pub use value_objects::{DataQualityWarning, EpisodeMetrics, WarningKind};
