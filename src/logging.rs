//! Logging functionality for FontSnap
//!
//! This module provides utilities for configuring and working with logging
//! through the `tracing` crate.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "FONTSNAP_LOG";

/// Log levels supported by FontSnap.
///
/// These map to the tracing level hierarchy: ERROR, WARN, INFO, DEBUG, TRACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error logs only
    Error,
    /// Warning and error logs
    Warn,
    /// Normal operational messages
    #[default]
    Info,
    /// Request and response detail
    Debug,
    /// Everything, including prompt and payload traces
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Initialize logging with a specific log level.
///
/// Call once at startup. Setting the `FONTSNAP_LOG` environment variable
/// takes precedence over `level`:
///
/// ```bash
/// FONTSNAP_LOG=fontsnap=debug,tower_http=info fontsnap serve
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        EnvFilter::new(format!("fontsnap={}", level.to_tracing_level()))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("FontSnap logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter directive string.
///
/// ```no_run
/// use fontsnap::logging::init_logging_with_filter;
///
/// init_logging_with_filter("fontsnap=debug,fontsnap::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        eprintln!("Invalid log filter '{}', using fontsnap=info", filter);
        EnvFilter::new("fontsnap=info")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("FontSnap logging initialized with custom filter: {}", filter);
}
