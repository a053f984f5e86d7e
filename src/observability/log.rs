//! Tracing-based observer that emits structured log events.
//!
//! Warnings land at `warn` level so session-less sends and deprecated calls
//! show up in normal application logs; job bookkeeping stays at `debug`.

use crate::config::saturating_millis;
use crate::observability::traits::{Observer, ObserverEvent, ObserverMetric};

/// Observer that logs events and metrics via `tracing`.
pub struct LogObserver;

impl Observer for LogObserver {
    #[allow(clippy::cognitive_complexity)] // tracing macros inflate complexity
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::SessionMissing {
                platform,
                operation,
            } => {
                tracing::warn!(
                    platform,
                    operation,
                    "{} without session, skipping",
                    operation
                );
            }
            ObserverEvent::DeprecatedCall {
                operation,
                replacement,
            } => {
                tracing::warn!(
                    operation,
                    replacement,
                    "{} is deprecated, use {} instead",
                    operation,
                    replacement
                );
            }
            ObserverEvent::JobEnqueued {
                job_id,
                operation,
                delay,
            } => {
                tracing::debug!(
                    job_id = %job_id,
                    operation,
                    delay_ms = saturating_millis(*delay),
                    "observer: job.enqueued"
                );
            }
            ObserverEvent::JobSettled {
                job_id,
                operation,
                duration,
                success,
                error_message,
            } => {
                tracing::debug!(
                    job_id = %job_id,
                    operation,
                    duration_ms = saturating_millis(*duration),
                    success,
                    error = error_message.as_deref().unwrap_or(""),
                    "observer: job.settled"
                );
            }
            ObserverEvent::Error { component, message } => {
                tracing::warn!(component, error = message.as_str(), "observer: error");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::JobLatency(d) => {
                tracing::debug!(
                    latency_ms = saturating_millis(*d),
                    "observer: metric.job_latency"
                );
            }
            ObserverMetric::QueueDepth(n) => {
                tracing::debug!(queue_depth = n, "observer: metric.queue_depth");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
