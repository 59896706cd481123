//! Logging setup
//!
//! Installs the global `tracing` subscriber from the log configuration.

use crate::config::{LogConfig, LogEncoding};
use crate::utils::error::{ExporterError, Result};
use tracing_subscriber::EnvFilter;

/// Filter built from the configured level or directive
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(&config.level).map_err(|e| {
        ExporterError::config(format!("invalid log level {:?}: {}", config.level, e))
    })
}

/// Install the global subscriber; fails if one is already installed
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let with_caller = !config.disable_caller;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(with_caller)
        .with_line_number(with_caller);

    let installed = if config.development {
        builder.pretty().with_ansi(true).try_init()
    } else {
        match config.encoding {
            LogEncoding::Json => builder.json().with_current_span(false).try_init(),
            LogEncoding::Console => builder.with_ansi(false).with_target(false).try_init(),
        }
    };

    installed.map_err(|e| ExporterError::config(format!("failed to initialize logging: {}", e)))
}
