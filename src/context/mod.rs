//! Per-conversation context over a platform client.
//!
//! A [`ConversationContext`] binds one [`DelayableJobQueue`] to one
//! conversation. Every outbound send goes through that queue, so replies to
//! the same user never interleave, each is preceded by the context's delay,
//! and typing indicators bracket each send.
//!
//! Contexts without a session accept every call but send nothing: each
//! session-scoped call reports a [`ObserverEvent::SessionMissing`] warning
//! and resolves with [`SendOutcome::Skipped`].

mod indicators;
mod reply;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::{ContextConfig, saturating_millis};
use crate::error::ContextError;
use crate::observability::{LogObserver, Observer, ObserverEvent, create_observer};
use crate::platform::{PlatformClient, SendMethod, SessionBinding};
use crate::queue::{DelayableJobQueue, Job, QueueState};

use self::indicators::{TypingOff, TypingThenPause};
pub use self::reply::{Reply, SendOutcome};

/// Outbound surface for one conversation.
pub struct ConversationContext<C: PlatformClient> {
    client: Arc<C>,
    event: Value,
    session: SessionBinding,
    default_delay_ms: AtomicU64,
    show_indicators: bool,
    observer: Arc<dyn Observer>,
    queue: DelayableJobQueue,
}

impl<C: PlatformClient> ConversationContext<C> {
    /// Create a context with default pacing (1000 ms, indicators on) that
    /// reports warnings through `tracing`.
    ///
    /// Outside a Tokio runtime every queued send resolves to
    /// [`ContextError::QueueClosed`].
    pub fn new(client: Arc<C>, event: Value, session: impl Into<SessionBinding>) -> Self {
        Self::with_observer(
            client,
            event,
            session,
            &ContextConfig::default(),
            Arc::new(LogObserver),
        )
    }

    /// Create a context whose observer is built from `config.observability`.
    pub fn from_config(
        client: Arc<C>,
        event: Value,
        session: impl Into<SessionBinding>,
        config: &ContextConfig,
    ) -> Self {
        let observer: Arc<dyn Observer> = Arc::from(create_observer(&config.observability));
        Self::with_observer(client, event, session, config, observer)
    }

    /// Like [`from_config`](Self::from_config), reporting to `observer`
    /// instead of the configured backend.
    pub fn with_observer(
        client: Arc<C>,
        event: Value,
        session: impl Into<SessionBinding>,
        config: &ContextConfig,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let session = session.into();
        let user_id = session.user_id().map(str::to_owned);

        let queue = DelayableJobQueue::with_observer(Arc::clone(&observer));
        queue.before_each(Arc::new(TypingThenPause {
            client: Arc::clone(&client),
            user_id: user_id.clone(),
        }));
        queue.after(Arc::new(TypingOff {
            client: Arc::clone(&client),
            user_id,
        }));

        Self {
            client,
            event,
            session,
            default_delay_ms: AtomicU64::new(saturating_millis(config.default_delay)),
            show_indicators: config.show_indicators,
            observer,
            queue,
        }
    }

    /// Identity of the backend this context talks to.
    pub fn platform(&self) -> &'static str {
        C::PLATFORM
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// The inbound event this context was created for.
    pub fn event(&self) -> &Value {
        &self.event
    }

    pub fn session(&self) -> &SessionBinding {
        &self.session
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms.load(Ordering::Relaxed))
    }

    /// Change the delay used by sends queued from now on.
    pub fn set_default_delay(&self, delay: Duration) {
        self.default_delay_ms
            .store(saturating_millis(delay), Ordering::Relaxed);
    }

    pub fn queue_state(&self) -> QueueState {
        self.queue.state()
    }

    pub fn pending_jobs(&self) -> usize {
        self.queue.pending()
    }

    /// Resolve once every queued send has settled.
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }

    /// Show typing for `duration`, outside the send queue.
    pub async fn typing(&self, duration: Duration) -> Result<SendOutcome, ContextError> {
        let Some(user_id) = self.bound_user("typing") else {
            return Ok(SendOutcome::Skipped);
        };
        self.client.typing_on(user_id).await?;
        tokio::time::sleep(duration).await;
        let value = self.client.typing_off(user_id).await?;
        Ok(SendOutcome::Delivered(value))
    }

    pub async fn typing_on(&self) -> Result<SendOutcome, ContextError> {
        let Some(user_id) = self.bound_user("typingOn") else {
            return Ok(SendOutcome::Skipped);
        };
        Ok(SendOutcome::Delivered(
            self.client.typing_on(user_id).await?,
        ))
    }

    pub async fn typing_off(&self) -> Result<SendOutcome, ContextError> {
        let Some(user_id) = self.bound_user("typingOff") else {
            return Ok(SendOutcome::Skipped);
        };
        Ok(SendOutcome::Delivered(
            self.client.typing_off(user_id).await?,
        ))
    }

    /// Queue a text message paced by the default delay.
    pub fn send_text(&self, text: impl Into<String>, options: Option<Value>) -> Reply {
        self.queue_text(self.default_delay(), text.into(), options)
    }

    /// Queue a text message paced by an explicit delay.
    pub fn send_text_with_delay(&self, delay: Duration, text: impl Into<String>) -> Reply {
        self.queue_text(delay, text.into(), None)
    }

    /// Queue any table-driven send with the default delay.
    pub fn send(&self, method: SendMethod, args: Vec<Value>) -> Reply {
        self.dispatch(method, self.default_delay(), args)
    }

    /// Queue any table-driven send with an explicit delay.
    #[deprecated(note = "use `set_default_delay` and `send` instead")]
    pub fn send_with_delay(&self, method: SendMethod, delay: Duration, args: Vec<Value>) -> Reply {
        self.warn_deprecated(method);
        self.dispatch(method, delay, args)
    }

    fn queue_text(&self, delay: Duration, text: String, options: Option<Value>) -> Reply {
        let Some(user_id) = self.bound_user("sendText") else {
            return Reply::skipped();
        };
        let client = Arc::clone(&self.client);
        let user_id = user_id.to_owned();
        let job = Job::new("sendText", move || async move {
            client.send_text(&user_id, &text, options).await
        })
        .with_delay(delay)
        .with_indicators(self.show_indicators);
        self.enqueue(job)
    }

    fn dispatch(&self, method: SendMethod, delay: Duration, args: Vec<Value>) -> Reply {
        let Some(user_id) = self.bound_user(method.name()) else {
            return Reply::skipped();
        };
        let client = Arc::clone(&self.client);
        let user_id = user_id.to_owned();
        let job = Job::new(method.name(), move || async move {
            client.send(method, &user_id, args).await
        })
        .with_delay(delay)
        .with_indicators(self.show_indicators);
        self.enqueue(job)
    }

    /// Queue `job` and hand back a [`Reply`] its callbacks settle.
    fn enqueue(&self, job: Job) -> Reply {
        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Mutex::new(Some(tx)));
        let err_slot = Arc::clone(&slot);

        self.queue.enqueue(
            job.on_success(move |value| settle(&slot, Ok(value)))
                .on_error(move |e| settle(&err_slot, Err(e))),
        );
        Reply::waiting(rx)
    }

    fn bound_user(&self, operation: &str) -> Option<&str> {
        match &self.session {
            SessionBinding::Bound(session) => Some(session.user_id()),
            SessionBinding::Unbound => {
                self.observer.record_event(&ObserverEvent::SessionMissing {
                    platform: C::PLATFORM.to_string(),
                    operation: operation.to_string(),
                });
                None
            }
        }
    }

    fn warn_deprecated(&self, method: SendMethod) {
        self.observer.record_event(&ObserverEvent::DeprecatedCall {
            operation: method.with_delay_name().to_string(),
            replacement: method.name().to_string(),
        });
    }
}

type SettleSlot = Mutex<Option<oneshot::Sender<Result<Value, ContextError>>>>;

fn settle(slot: &SettleSlot, result: Result<Value, ContextError>) {
    if let Some(tx) = slot.lock().unwrap_or_else(|e| e.into_inner()).take() {
        // The caller may have dropped its Reply; the send still happened.
        let _ = tx.send(result);
    }
}

/// Generate one paced method and one deprecated explicit-delay method per
/// [`SendMethod`] entry.
macro_rules! send_methods {
    ($($method:ident, $with_delay:ident => $variant:ident ($name:literal);)*) => {
        impl<C: PlatformClient> ConversationContext<C> {
            $(
                #[doc = concat!("Queue `", $name, "(user_id, ...args)` with the default delay.")]
                pub fn $method(&self, args: Vec<Value>) -> Reply {
                    self.send(SendMethod::$variant, args)
                }

                #[doc = concat!("Queue `", $name, "(user_id, ...args)` after `delay`.")]
                #[deprecated(note = "use `set_default_delay` and the non-delay variant instead")]
                pub fn $with_delay(&self, delay: Duration, args: Vec<Value>) -> Reply {
                    self.warn_deprecated(SendMethod::$variant);
                    self.dispatch(SendMethod::$variant, delay, args)
                }
            )*
        }
    };
}

send_methods! {
    send_attachment, send_attachment_with_delay => Attachment ("sendAttachment");
    send_image, send_image_with_delay => Image ("sendImage");
    send_audio, send_audio_with_delay => Audio ("sendAudio");
    send_video, send_video_with_delay => Video ("sendVideo");
    send_file, send_file_with_delay => File ("sendFile");
    send_quick_replies, send_quick_replies_with_delay => QuickReplies ("sendQuickReplies");
    send_generic_template, send_generic_template_with_delay => GenericTemplate ("sendGenericTemplate");
    send_button_template, send_button_template_with_delay => ButtonTemplate ("sendButtonTemplate");
    send_list_template, send_list_template_with_delay => ListTemplate ("sendListTemplate");
    send_receipt_template, send_receipt_template_with_delay => ReceiptTemplate ("sendReceiptTemplate");
    send_airline_boarding_pass_template, send_airline_boarding_pass_template_with_delay
        => AirlineBoardingPassTemplate ("sendAirlineBoardingPassTemplate");
    send_airline_checkin_template, send_airline_checkin_template_with_delay
        => AirlineCheckinTemplate ("sendAirlineCheckinTemplate");
    send_airline_itinerary_template, send_airline_itinerary_template_with_delay
        => AirlineItineraryTemplate ("sendAirlineItineraryTemplate");
    send_airline_flight_update_template, send_airline_flight_update_template_with_delay
        => AirlineFlightUpdateTemplate ("sendAirlineFlightUpdateTemplate");
}
