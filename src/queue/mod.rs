//! Sequential, delayable job queue.
//!
//! A [`DelayableJobQueue`] owns one consumer task that pulls jobs off an
//! unbounded FIFO channel and runs them strictly one at a time:
//!
//! 1. the `before_each` hook runs with the job's [`JobPacing`]
//! 2. the job's action is invoked and awaited
//! 3. the `after` hook runs
//! 4. the outcome goes to the job's `on_success` or `on_error`
//!
//! A failing job never stops the queue. Hook failures and panics are isolated
//! to the job they ran for: the caller sees the first failure in before →
//! action → after order, and a later hook failure is reported to the observer.

pub mod hook;
pub mod job;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, RwLock};

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::error::ContextError;
use crate::observability::{NoopObserver, Observer, ObserverEvent, ObserverMetric};

pub use hook::{FnHook, JobHook, hook_fn};
pub use job::{Job, JobAction, JobPacing, OnError, OnSuccess};

/// Whether a queue currently has unsettled jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// No jobs pending.
    Idle,
    /// At least one job pending, one of them executing.
    Draining,
}

type HookSlot = RwLock<Option<Arc<dyn JobHook>>>;

struct Shared {
    before_each: HookSlot,
    after: HookSlot,
    pending: Mutex<usize>,
    state: watch::Sender<QueueState>,
    observer: Arc<dyn Observer>,
}

impl Shared {
    fn hook(slot: &HookSlot) -> Option<Arc<dyn JobHook>> {
        slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn job_added(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending += 1;
        self.state.send_replace(QueueState::Draining);
        *pending
    }

    fn job_settled(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.state.send_replace(QueueState::Idle);
        }
        *pending
    }

    async fn run(&self, job: Job) {
        let Job {
            id,
            operation,
            action,
            pacing,
            on_success,
            on_error,
        } = job;
        let started = Instant::now();

        let result = match Self::hook(&self.before_each) {
            Some(hook) => {
                guarded(&operation, async {
                    hook.run(pacing).await.map_err(ContextError::from)
                })
                .await
            }
            None => Ok(()),
        };

        let result = match result {
            Ok(()) => {
                let outcome = guarded(&operation, async move {
                    action().await.map_err(ContextError::from)
                })
                .await;
                match Self::hook(&self.after) {
                    Some(hook) => {
                        let after = guarded(&operation, async {
                            hook.run(pacing).await.map_err(ContextError::from)
                        })
                        .await;
                        match (after, outcome) {
                            (Ok(()), outcome) => outcome,
                            (Err(e), Ok(_)) => Err(e),
                            (Err(e), Err(action_err)) => {
                                self.observer.record_event(&ObserverEvent::Error {
                                    component: format!("queue.after[{}]", hook.name()),
                                    message: e.to_string(),
                                });
                                Err(action_err)
                            }
                        }
                    }
                    None => outcome,
                }
            }
            Err(e) => {
                tracing::debug!(
                    job_id = %id,
                    operation = operation.as_str(),
                    error = %e,
                    "before hook failed, skipping job"
                );
                Err(e)
            }
        };

        let duration = started.elapsed();
        self.observer.record_event(&ObserverEvent::JobSettled {
            job_id: id,
            operation,
            duration,
            success: result.is_ok(),
            error_message: result.as_ref().err().map(|e| e.to_string()),
        });
        self.observer.record_metric(&ObserverMetric::JobLatency(duration));

        match result {
            Ok(value) => on_success(value),
            Err(e) => on_error(e),
        }
    }
}

/// Run one stage of a job, turning a panic into a rejection of that job.
async fn guarded<T>(
    operation: &str,
    stage: impl Future<Output = Result<T, ContextError>>,
) -> Result<T, ContextError> {
    match AssertUnwindSafe(stage).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(operation, panic = message.as_str(), "job panicked");
            Err(ContextError::JobPanicked {
                operation: operation.to_string(),
                message,
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

/// FIFO runner executing one job at a time with pacing hooks.
///
/// The consumer task is spawned on the current Tokio runtime. Outside a
/// runtime there is no consumer and every job is rejected with
/// [`ContextError::QueueClosed`]. Dropping the queue closes the channel; jobs
/// already enqueued still run before the task exits.
pub struct DelayableJobQueue {
    tx: mpsc::UnboundedSender<Job>,
    shared: Arc<Shared>,
}

impl DelayableJobQueue {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn Observer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(QueueState::Idle);
        let shared = Arc::new(Shared {
            before_each: RwLock::new(None),
            after: RwLock::new(None),
            pending: Mutex::new(0),
            state,
            observer,
        });
        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(drain(rx, Arc::clone(&shared)));
            }
            Err(e) => {
                tracing::error!(error = %e, "no Tokio runtime, job queue rejects every job");
                drop(rx);
            }
        }
        Self { tx, shared }
    }

    /// Register the hook run before every job. Replaces any previous one.
    pub fn before_each(&self, hook: Arc<dyn JobHook>) {
        *self
            .shared
            .before_each
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(hook);
    }

    /// Register the hook run after every job. Replaces any previous one.
    pub fn after(&self, hook: Arc<dyn JobHook>) {
        *self.shared.after.write().unwrap_or_else(|e| e.into_inner()) = Some(hook);
    }

    /// Append a job. Never blocks; the outcome arrives through the job's
    /// `on_success` / `on_error`.
    pub fn enqueue(&self, job: Job) {
        let depth = self.shared.job_added();
        self.shared.observer.record_event(&ObserverEvent::JobEnqueued {
            job_id: job.id,
            operation: job.operation.clone(),
            delay: job.pacing.delay,
        });
        self.shared
            .observer
            .record_metric(&ObserverMetric::QueueDepth(depth as u64));

        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            tracing::warn!(
                job_id = %job.id,
                operation = job.operation.as_str(),
                "job queue closed, rejecting job"
            );
            self.shared.job_settled();
            (job.on_error)(ContextError::QueueClosed);
        }
    }

    pub fn state(&self) -> QueueState {
        *self.shared.state.borrow()
    }

    /// Jobs enqueued and not yet settled, including the one executing.
    pub fn pending(&self) -> usize {
        *self.shared.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve once the queue is idle. Returns immediately if it already is.
    pub async fn wait_idle(&self) {
        let mut rx = self.shared.state.subscribe();
        let _ = rx.wait_for(|state| *state == QueueState::Idle).await;
    }
}

impl Default for DelayableJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

async fn drain(mut rx: mpsc::UnboundedReceiver<Job>, shared: Arc<Shared>) {
    while let Some(job) = rx.recv().await {
        // Stage panics are already caught; this covers the settle callbacks.
        if AssertUnwindSafe(shared.run(job)).catch_unwind().await.is_err() {
            tracing::error!("job callback panicked");
        }
        let remaining = shared.job_settled();
        tracing::trace!(remaining, "job settled");
    }
    tracing::debug!("job queue closed, consumer exiting");
}
