//! Metric and integrity-check tuning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::episode::services::DEFAULT_ANNUALIZATION_DAYS;
use crate::domain::integrity::DEFAULT_EPSILON;

/// Episode metric configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Trading days per year used for annualized returns.
    #[serde(default = "default_annualization_days")]
    pub annualization_days: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            annualization_days: default_annualization_days(),
        }
    }
}

/// Integrity check configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// Largest tolerated difference between stored and recomputed amounts.
    #[serde(default = "default_epsilon")]
    pub epsilon: Decimal,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

const fn default_annualization_days() -> u32 {
    DEFAULT_ANNUALIZATION_DAYS
}

const fn default_epsilon() -> Decimal {
    DEFAULT_EPSILON
}
