//! Tracing subscriber setup for the journal engine.
//!
//! # Example
//!
//! ```ignore
//! use journal_engine::observability::{init_tracing, TracingConfig};
//!
//! init_tracing(&TracingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::config::LoggingConfig;

/// Configuration for the log subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_directive: "journal_engine=info".to_string(),
            json: false,
        }
    }
}

impl From<&LoggingConfig> for TracingConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            default_directive: format!("journal_engine={}", logging.level),
            json: logging.json,
        }
    }
}

/// Error type for tracing operations.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Offending directive.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Install the global log subscriber.
///
/// `RUST_LOG` takes precedence; the configured directive is added on top.
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the directive is invalid or a subscriber is
/// already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let directive = config
        .default_directive
        .parse::<Directive>()
        .map_err(|e| TracingError::InvalidFilter {
            directive: config.default_directive.clone(),
            message: e.to_string(),
        })?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| TracingError::SubscriberError(e.to_string()))?;

    tracing::debug!(json = config.json, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_config_maps_level() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            json: true,
        };
        let config = TracingConfig::from(&logging);
        assert_eq!(config.default_directive, "journal_engine=debug");
        assert!(config.json);
    }

    #[test]
    fn invalid_directive_is_rejected() {
        let config = TracingConfig {
            default_directive: "journal_engine=loud".to_string(),
            json: false,
        };
        assert!(matches!(
            init_tracing(&config),
            Err(TracingError::InvalidFilter { .. })
        ));
    }
}
