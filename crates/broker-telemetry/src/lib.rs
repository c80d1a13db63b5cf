//! # Broker Telemetry
//!
//! Log output for processes embedding `topic-broker`.
//!
//! The broker itself only emits `tracing` events; this crate installs the
//! global subscriber that renders them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use broker_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // broker debug/warn records are now written to stdout
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BROKER_SERVICE_NAME` | `topic-broker` | Service name in the startup record |
//! | `BROKER_LOG_LEVEL` | `info` | Filter directive (falls back to `RUST_LOG`) |
//! | `BROKER_CONSOLE_OUTPUT` | `true` | Write records to stdout |
//! | `BROKER_JSON_LOGS` | `false` | JSON records (default `true` in containers) |

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter directive: {0}")]
    Filter(String),

    #[error("Global tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber described by `config`.
///
/// Returns a guard that should be held for the lifetime of the application.
///
/// # Errors
///
/// - `TelemetryError::Filter` if the log level is not a valid directive
/// - `TelemetryError::AlreadyInitialized` if a global subscriber exists
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Install a test-friendly subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call in a process installs
/// anything.
pub fn init_test_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok(); // Ignore error if already initialized
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
