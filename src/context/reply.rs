//! Deferred result handed back by every send operation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::ContextError;

/// What happened to a send request.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The platform call ran and resolved with this response.
    Delivered(Value),
    /// The context had no session; nothing was sent.
    Skipped,
}

impl SendOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SendOutcome::Skipped)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            SendOutcome::Delivered(value) => Some(value),
            SendOutcome::Skipped => None,
        }
    }
}

enum ReplyState {
    Ready(Option<SendOutcome>),
    Waiting(oneshot::Receiver<Result<Value, ContextError>>),
}

/// Future settling with the eventual platform result of a queued send.
///
/// The job is already enqueued when a `Reply` is returned, so dropping it
/// does not withdraw the send.
#[must_use = "a Reply reports whether the send succeeded"]
pub struct Reply {
    state: ReplyState,
}

impl Reply {
    pub(crate) fn skipped() -> Self {
        Self {
            state: ReplyState::Ready(Some(SendOutcome::Skipped)),
        }
    }

    pub(crate) fn waiting(rx: oneshot::Receiver<Result<Value, ContextError>>) -> Self {
        Self {
            state: ReplyState::Waiting(rx),
        }
    }
}

impl Future for Reply {
    type Output = Result<SendOutcome, ContextError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            ReplyState::Ready(outcome) => {
                Poll::Ready(Ok(outcome.take().unwrap_or(SendOutcome::Skipped)))
            }
            ReplyState::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result.map(SendOutcome::Delivered)),
                // Sender dropped without settling: the consumer task is gone.
                Poll::Ready(Err(_)) => Poll::Ready(Err(ContextError::QueueClosed)),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            ReplyState::Ready(_) => "ready",
            ReplyState::Waiting(_) => "waiting",
        };
        f.debug_struct("Reply").field("state", &state).finish()
    }
}
