//! Tracing subscriber setup.

use crate::LoggingConfig;
use loadout_error::{ConfigError, LoadoutResult};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. With `config.json` set,
/// events are written as JSON lines.
///
/// # Errors
///
/// Returns error if the level directive is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> LoadoutResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            ConfigError::new(format!("Invalid log level '{}': {}", config.level, e))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.with_target(true).try_init()
    };

    result.map_err(|e| ConfigError::new(format!("Failed to initialize logging: {}", e)))?;
    Ok(())
}
