//! Logging and metrics initialization.

pub mod metrics;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Initialize the global tracing subscriber from configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|err| Error::config_with_source("Invalid log level filter", Box::new(err)))?;

    if config.json_logging {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .try_init()
            .map_err(|err| Error::config(format!("Failed to initialize logging: {}", err)))?;
    } else {
        fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|err| Error::config(format!("Failed to initialize logging: {}", err)))?;
    }

    Ok(())
}
