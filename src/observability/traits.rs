//! Core observer trait and event/metric types.

use std::time::Duration;

use uuid::Uuid;

/// Provider-agnostic sink for conversation diagnostics.
///
/// Contexts and their job queues report session warnings, deprecation
/// notices and job outcomes here instead of writing to the console. The
/// observer decides whether to log them, fan them out, or drop them.
///
/// Thread-safe and cheaply cloneable behind `Arc<dyn Observer>`.
pub trait Observer: Send + Sync {
    /// Record a discrete diagnostic event.
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric sample.
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data. No-op by default.
    fn flush(&self) {}

    /// Human-readable backend name (e.g. "noop", "log", "multi").
    fn name(&self) -> &str;
}

/// Discrete events emitted by contexts and queues.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    /// A session-scoped operation was called on a context without a session.
    SessionMissing {
        platform: String,
        operation: String,
    },

    /// A deprecated `..._with_delay` variant was called.
    DeprecatedCall {
        operation: String,
        replacement: String,
    },

    /// A job was accepted by the queue.
    JobEnqueued {
        job_id: Uuid,
        operation: String,
        delay: Duration,
    },

    /// A job finished, successfully or not.
    JobSettled {
        job_id: Uuid,
        operation: String,
        duration: Duration,
        success: bool,
        /// Error description when `success` is false.
        error_message: Option<String>,
    },

    /// An error occurred in a component outside a job's own result.
    Error { component: String, message: String },
}

impl ObserverEvent {
    /// Whether this event represents a caller-facing warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ObserverEvent::SessionMissing { .. }
                | ObserverEvent::DeprecatedCall { .. }
                | ObserverEvent::Error { .. }
        )
    }
}

/// Numeric metric samples.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverMetric {
    /// Time from dequeue to settlement of a single job, including pacing.
    JobLatency(Duration),
    /// Current number of unsettled jobs in a queue (gauge).
    QueueDepth(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_classified() {
        assert!(
            ObserverEvent::SessionMissing {
                platform: "messenger".into(),
                operation: "sendText".into(),
            }
            .is_warning()
        );
        assert!(
            ObserverEvent::DeprecatedCall {
                operation: "sendImageWithDelay".into(),
                replacement: "sendImage".into(),
            }
            .is_warning()
        );
        assert!(
            !ObserverEvent::JobSettled {
                job_id: Uuid::new_v4(),
                operation: "sendText".into(),
                duration: Duration::from_millis(5),
                success: true,
                error_message: None,
            }
            .is_warning()
        );
    }
}
