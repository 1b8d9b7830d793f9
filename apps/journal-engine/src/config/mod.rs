//! Configuration module for the journal engine.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use journal_engine::config::load_config;
//!
//! // Load from default path (journal.yaml)
//! let config = load_config(None)?;
//!
//! println!("ledger: {}", config.ledger.path);
//! ```

mod analysis;
mod observability;
mod sources;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analysis::{IntegrityConfig, MetricsConfig};
pub use observability::LoggingConfig;
pub use sources::{LedgerConfig, StoreConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "journal.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Execution ledger source.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Historical trade store.
    #[serde(default)]
    pub store: StoreConfig,
    /// Integrity check tuning.
    #[serde(default)]
    pub integrity: IntegrityConfig,
    /// Episode metric tuning.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.ledger.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ledger.path must not be empty".to_string(),
        ));
    }

    if config.store.path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "store.path must not be empty".to_string(),
        ));
    }

    if config.ledger.path == config.store.path {
        return Err(ConfigError::ValidationError(
            "ledger.path and store.path must be different".to_string(),
        ));
    }

    if config.integrity.epsilon < Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "integrity.epsilon must not be negative".to_string(),
        ));
    }

    if config.metrics.annualization_days == 0 || config.metrics.annualization_days > 366 {
        return Err(ConfigError::ValidationError(
            "metrics.annualization_days must be between 1 and 366".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_lowercase().as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "logging.level must be one of: {valid_levels:?}"
        )));
    }

    Ok(())
}
