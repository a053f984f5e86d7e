//! Configuration for conversation contexts.

use std::time::Duration;

use crate::error::ConfigError;
use crate::observability::ObservabilityConfig;

/// Delay applied before each paced send unless overridden.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(1000);

/// Settings shared by every context a bot creates.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Pause before each queued send (default 1000 ms).
    pub default_delay: Duration,
    /// Whether queued sends are bracketed by typing on/off signals.
    pub show_indicators: bool,
    pub observability: ObservabilityConfig,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            default_delay: DEFAULT_MESSAGE_DELAY,
            show_indicators: true,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ContextConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::resolve()
    }

    /// Build from the current process environment without touching `.env`.
    pub fn resolve() -> Result<Self, ConfigError> {
        let delay_ms: u64 = parse_optional_env(
            "CONVERSATION_DEFAULT_DELAY_MS",
            saturating_millis(DEFAULT_MESSAGE_DELAY),
        )?;
        Ok(Self {
            default_delay: Duration::from_millis(delay_ms),
            show_indicators: parse_bool_env("CONVERSATION_SHOW_INDICATORS", true)?,
            observability: ObservabilityConfig::resolve()?,
        })
    }
}

// Helper functions

/// Whole milliseconds in `delay`, clamped to `u64::MAX`.
pub(crate) fn saturating_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}

pub(crate) fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    optional_env(key)?
        .map(|s| match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("must be 'true' or 'false', got '{s}'"),
            }),
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}
