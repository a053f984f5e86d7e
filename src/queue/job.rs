//! Units of outbound work and their pacing metadata.

use std::future::Future;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ContextError, PlatformError};

/// Deferred platform call run by the queue exactly once.
pub type JobAction = Box<dyn FnOnce() -> BoxFuture<'static, Result<Value, PlatformError>> + Send>;

/// Receives the action's resolved value.
pub type OnSuccess = Box<dyn FnOnce(Value) + Send>;

/// Receives the action's (or a hook's) failure.
pub type OnError = Box<dyn FnOnce(ContextError) + Send>;

/// How a job is paced; handed to the before/after hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPacing {
    /// Pause before the action is invoked.
    pub delay: Duration,
    /// Whether typing indicators bracket the action.
    pub show_indicators: bool,
}

impl Default for JobPacing {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            show_indicators: true,
        }
    }
}

/// One queued outbound action.
///
/// Built with [`Job::new`] and the `with_*` / `on_*` builders, then handed to
/// [`DelayableJobQueue::enqueue`](crate::queue::DelayableJobQueue::enqueue),
/// which consumes it.
pub struct Job {
    pub(crate) id: Uuid,
    pub(crate) operation: String,
    pub(crate) action: JobAction,
    pub(crate) pacing: JobPacing,
    pub(crate) on_success: OnSuccess,
    pub(crate) on_error: OnError,
}

impl Job {
    /// Create a job labelled `operation` that runs `action` when dequeued.
    pub fn new<F, Fut>(operation: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Value, PlatformError>> + Send + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            operation: operation.into(),
            action: Box::new(move || action().boxed()),
            pacing: JobPacing::default(),
            on_success: Box::new(|_| {}),
            on_error: Box::new(|_| {}),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.pacing.delay = delay;
        self
    }

    pub fn with_indicators(mut self, show_indicators: bool) -> Self {
        self.pacing.show_indicators = show_indicators;
        self
    }

    pub fn on_success(mut self, f: impl FnOnce(Value) + Send + 'static) -> Self {
        self.on_success = Box::new(f);
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(ContextError) + Send + 'static) -> Self {
        self.on_error = Box::new(f);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn pacing(&self) -> JobPacing {
        self.pacing
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}
