//! Error types for conversation contexts.

use std::time::Duration;

/// Error delivered to the caller of a queued send.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ContextError {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("Job {operation} panicked: {message}")]
    JobPanicked { operation: String, message: String },

    #[error("Job queue for conversation is closed")]
    QueueClosed,
}

/// Errors surfaced by the wrapped platform client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform {platform} request {operation} failed: {reason}")]
    RequestFailed {
        platform: String,
        operation: String,
        reason: String,
    },

    #[error("Platform {platform} rate limited, retry after {retry_after:?}")]
    RateLimited {
        platform: String,
        retry_after: Option<Duration>,
    },

    #[error("Platform {platform} does not support {operation}")]
    Unsupported { platform: String, operation: String },
}

/// Before/after hook failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HookError {
    #[error("Hook execution failed: {reason}")]
    ExecutionFailed { reason: String },

    #[error("Typing indicator failed: {0}")]
    Indicator(#[from] PlatformError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}
