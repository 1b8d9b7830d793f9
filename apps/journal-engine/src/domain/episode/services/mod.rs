//! Episode domain services.

mod derivation;
mod metrics_calculator;
mod position_tracker;

pub use derivation::{
    DerivedEpisode, EpisodeFailure, LedgerDerivation, OpenPosition, derive_episodes,
    group_by_instrument, track_ledger,
};
pub use metrics_calculator::{DEFAULT_ANNUALIZATION_DAYS, EpisodeMetricsCalculator};
pub use position_tracker::PositionTracker;
