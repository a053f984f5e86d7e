//! Before/after hooks run around every queued job.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HookError;
use crate::queue::job::JobPacing;

/// Trait for code that runs before or after each job.
///
/// A queue holds at most one hook per slot; registering again replaces it.
#[async_trait]
pub trait JobHook: Send + Sync {
    /// A name used in diagnostics.
    fn name(&self) -> &str;

    /// Run for one job with that job's pacing.
    async fn run(&self, pacing: JobPacing) -> Result<(), HookError>;
}

/// Adapter turning an async closure into a [`JobHook`].
pub struct FnHook<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut> JobHook for FnHook<F>
where
    F: Fn(JobPacing) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, pacing: JobPacing) -> Result<(), HookError> {
        (self.f)(pacing).await
    }
}

/// Wrap an async closure as a shareable hook.
pub fn hook_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn JobHook>
where
    F: Fn(JobPacing) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    Arc::new(FnHook {
        name: name.into(),
        f,
    })
}
