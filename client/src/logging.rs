//! # Structured Logging
//!
//! The client emits `tracing` events (`tx_id`, `gateway`, `attempt`, status
//! fields) from the retry engine and the consensus loop. A library must not
//! install a subscriber behind the application's back, so these helpers are
//! opt-in for binaries and tests that do not set up their own.
//!
//! Output goes to stderr. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" (case-insensitive); anything else is
    /// `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Installs the global subscriber. Panics if one is already installed; use
/// [`try_init_logging`] where that can happen.
///
/// `default_level` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"hashgraph_client=debug"`.
pub fn init_logging(default_level: &str, format: LogFormat) {
    if let Err(err) = try_init_logging(default_level, format) {
        panic!("failed to install tracing subscriber: {err}");
    }
}

/// Installs the global subscriber unless one is already installed.
pub fn try_init_logging(
    default_level: &str,
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init()?,
    }

    tracing::debug!(?format, "logging initialized");
    Ok(())
}
