//! Process-wide logging setup.
//!
//! `tracing` events go to a `fmt` subscriber; `log` records from the
//! persistence layer are bridged into it.

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to bridge log records: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

/// Filter from `RUST_LOG` if set and valid, else from `level`, else `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Call once at startup.
pub fn init(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.level);

    match config.format {
        LogFormat::Json => {
            let subscriber = fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let subscriber = fmt()
                .with_env_filter(filter)
                .with_thread_ids(true)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    tracing_log::LogTracer::init()?;
    Ok(())
}
