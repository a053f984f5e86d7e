//! Paced, indicator-aware outbound replies for chat-bot conversations.
//!
//! Each inbound conversation gets a [`ConversationContext`] wrapping the
//! platform client. Sends made through the context are queued per
//! conversation, delayed to feel human, and bracketed by typing indicators:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ironclaw_conversation::{ConversationContext, PlatformClient, Session};
//! # async fn reply<C: PlatformClient>(client: Arc<C>, event: serde_json::Value) {
//! let ctx = ConversationContext::new(client, event, Session::new("psid-1"));
//! let first = ctx.send_text("Hi there!", None);
//! let second = ctx.send_image(vec![serde_json::json!("https://example.com/wave.gif")]);
//! // Delivered in call order, each after a typing pause.
//! let _ = first.await;
//! let _ = second.await;
//! # }
//! ```
//!
//! Bots that configure themselves from the environment build contexts with
//! [`ConversationContext::from_config`], which picks the observer named by
//! `OBSERVABILITY_BACKEND`:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ironclaw_conversation::{ConfigError, ContextConfig, ConversationContext, PlatformClient, Session};
//! # use ironclaw_conversation::observability::init_tracing;
//! # fn build<C: PlatformClient>(client: Arc<C>) -> Result<(), ConfigError> {
//! let config = ContextConfig::from_env()?;
//! init_tracing(&config.observability);
//! let ctx = ConversationContext::from_config(
//!     client,
//!     serde_json::json!({}),
//!     Session::new("psid-1"),
//!     &config,
//! );
//! # let _ = ctx;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod observability;
pub mod platform;
pub mod queue;

pub use config::ContextConfig;
pub use context::{ConversationContext, Reply, SendOutcome};
pub use error::{ConfigError, ContextError, HookError, PlatformError};
pub use observability::{Observer, ObserverEvent, ObserverMetric};
pub use platform::{PlatformClient, SendMethod, Session, SessionBinding};
pub use queue::{DelayableJobQueue, Job, JobHook, JobPacing, QueueState};
