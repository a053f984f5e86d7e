//! Observability subsystem: trait-based diagnostics recording.
//!
//! Provides a pluggable [`Observer`] trait with multiple backends:
//!
//! | Backend | Description |
//! |---------|-------------|
//! | `noop`  | Zero overhead, discards everything (default) |
//! | `log`   | Emits structured events via `tracing` |
//! | `multi` | Fan-out to multiple backends simultaneously |
//!
//! The [`create_observer`] factory builds the right backend from
//! [`ObservabilityConfig`].

mod log;
mod multi;
mod noop;
pub mod traits;

#[cfg(test)]
pub mod recording;

use tracing_subscriber::EnvFilter;

use crate::config::{optional_env, parse_optional_env};
use crate::error::ConfigError;

pub use self::log::LogObserver;
pub use self::multi::MultiObserver;
pub use self::noop::NoopObserver;
pub use self::traits::{Observer, ObserverEvent, ObserverMetric};

/// Output format for [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected 'pretty' or 'json'")),
        }
    }
}

/// Configuration for the observability backend.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Backend name: "none", "noop", "log", or "log+noop".
    pub backend: String,
    /// Format used by [`init_tracing`].
    pub log_format: LogFormat,
}

impl ObservabilityConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            backend: optional_env("OBSERVABILITY_BACKEND")?.unwrap_or_else(|| "none".into()),
            log_format: parse_optional_env("LOG_FORMAT", LogFormat::Pretty)?,
        })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            backend: "none".into(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Create an observer from configuration.
///
/// Returns a [`NoopObserver`] for "none"/"noop" (or unknown values), a
/// [`LogObserver`] for "log", or a [`MultiObserver`] for compound backends
/// joined with `+`.
pub fn create_observer(config: &ObservabilityConfig) -> Box<dyn Observer> {
    let backend = config.backend.trim();
    if backend.contains('+') {
        let observers: Vec<Box<dyn Observer>> = backend
            .split('+')
            .map(|part| single_backend(part.trim()))
            .collect();
        return Box::new(MultiObserver::new(observers));
    }
    single_backend(backend)
}

fn single_backend(name: &str) -> Box<dyn Observer> {
    match name {
        "log" => Box::new(LogObserver),
        "none" | "noop" | "" => Box::new(NoopObserver),
        other => {
            tracing::warn!(backend = other, "Unknown observability backend, using noop");
            Box::new(NoopObserver)
        }
    }
}

/// Initialize tracing for the process.
///
/// Filtering follows `RUST_LOG` (default `info`). Safe to call multiple
/// times; later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };
}
