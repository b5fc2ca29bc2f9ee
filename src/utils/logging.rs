//! Structured logging setup.
//!
//! The library only emits `tracing` events; applications that want them
//! printed call [`init_logging`] once at startup.

use std::sync::OnceLock;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{HeaderError, Result};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Calling this again
/// after a successful initialization is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.as_str().to_lowercase()))
        .map_err(|e| HeaderError::ConfigError(format!("Invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init()
    };

    result.map_err(|e| HeaderError::ConfigError(format!("Failed to install subscriber: {e}")))?;
    let _ = INITIALIZED.set(());

    info!(app = %config.app_name, "Logging initialized");
    Ok(())
}
