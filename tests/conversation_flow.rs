//! End-to-end pacing tests through the public API.
//!
//! A scripted platform client records every call with its (paused) tokio
//! timestamp so ordering, pacing and indicator bracketing can be asserted
//! without real sleeps.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ironclaw_conversation::{
    ContextConfig, ContextError, ConversationContext, Observer, ObserverEvent, ObserverMetric,
    PlatformClient, PlatformError, QueueState, SendMethod, SendOutcome, Session,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Recorded {
    op: String,
    user_id: String,
    args: Vec<Value>,
    at: Instant,
}

#[derive(Default)]
struct ScriptedClient {
    calls: Mutex<Vec<Recorded>>,
}

impl ScriptedClient {
    fn push(&self, op: &str, user_id: &str, args: Vec<Value>) {
        self.calls.lock().unwrap().push(Recorded {
            op: op.to_string(),
            user_id: user_id.to_string(),
            args,
            at: Instant::now(),
        });
    }

    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformClient for ScriptedClient {
    const PLATFORM: &'static str = "messenger";

    async fn send_text(
        &self,
        user_id: &str,
        text: &str,
        _options: Option<Value>,
    ) -> Result<Value, PlatformError> {
        self.push("sendText", user_id, vec![json!(text)]);
        // Hold the "wire" briefly so overlapping calls would be visible.
        tokio::time::sleep(Duration::from_millis(20)).await;
        if text == "A" {
            return Err(PlatformError::RequestFailed {
                platform: Self::PLATFORM.into(),
                operation: "sendText".into(),
                reason: "(#100) Invalid parameter".into(),
            });
        }
        if text == "B" {
            return Ok(json!("ok"));
        }
        Ok(json!({ "message_id": format!("m.{text}") }))
    }

    async fn send(
        &self,
        method: SendMethod,
        user_id: &str,
        args: Vec<Value>,
    ) -> Result<Value, PlatformError> {
        self.push(method.name(), user_id, args);
        Ok(json!({ "recipient_id": user_id }))
    }

    async fn typing_on(&self, user_id: &str) -> Result<Value, PlatformError> {
        self.push("typingOn", user_id, vec![]);
        Ok(Value::Null)
    }

    async fn typing_off(&self, user_id: &str) -> Result<Value, PlatformError> {
        self.push("typingOff", user_id, vec![]);
        Ok(Value::Null)
    }
}

#[derive(Default)]
struct Diagnostics {
    events: Mutex<Vec<ObserverEvent>>,
}

impl Diagnostics {
    fn warnings(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_warning())
            .count()
    }
}

impl Observer for Diagnostics {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_metric(&self, _metric: &ObserverMetric) {}

    fn name(&self) -> &str {
        "diagnostics"
    }
}

fn context_for(
    user: Option<&str>,
) -> (
    ConversationContext<ScriptedClient>,
    Arc<ScriptedClient>,
    Arc<Diagnostics>,
) {
    let client = Arc::new(ScriptedClient::default());
    let diagnostics = Arc::new(Diagnostics::default());
    let ctx = ConversationContext::with_observer(
        Arc::clone(&client),
        json!({ "sender": { "id": user }, "message": { "text": "hey" } }),
        user.map(Session::new),
        &ContextConfig::default(),
        Arc::clone(&diagnostics) as Arc<dyn Observer>,
    );
    (ctx, client, diagnostics)
}

#[tokio::test(start_paused = true)]
async fn failed_reply_is_reported_and_next_reply_still_sent() {
    let (ctx, client, _) = context_for(Some("psid-7"));

    let a = ctx.send_text("A", None);
    let b = ctx.send_text("B", None);

    assert!(matches!(
        a.await,
        Err(ContextError::Platform(PlatformError::RequestFailed { .. }))
    ));
    assert_eq!(b.await.unwrap(), SendOutcome::Delivered(json!("ok")));

    let ops: Vec<String> = client.calls().into_iter().map(|c| c.op).collect();
    assert_eq!(
        ops,
        vec!["typingOn", "sendText", "typingOff", "typingOn", "sendText", "typingOff"]
    );
}

#[tokio::test(start_paused = true)]
async fn every_send_waits_out_the_delay_after_typing_on() {
    let (ctx, client, _) = context_for(Some("psid-7"));

    let replies = vec![
        ctx.send_text("one", None),
        ctx.send_image(vec![json!("https://example.com/1.png")]),
        ctx.send_text("two", None),
    ];
    for reply in replies {
        reply.await.unwrap();
    }

    let calls = client.calls();
    assert_eq!(calls.len(), 9);
    for triple in calls.chunks(3) {
        assert_eq!(triple[0].op, "typingOn");
        assert_eq!(triple[2].op, "typingOff");
        assert!(triple[1].at - triple[0].at >= Duration::from_millis(1000));
        assert!(triple[2].at >= triple[1].at);
    }
    // Next job's typing-on never precedes the previous typing-off.
    for pair in calls.windows(2) {
        assert!(pair[1].at >= pair[0].at);
    }
}

#[tokio::test(start_paused = true)]
#[allow(deprecated)]
async fn every_generated_method_reaches_its_client_operation() {
    let (ctx, client, diagnostics) = context_for(Some("psid-7"));
    ctx.set_default_delay(Duration::ZERO);

    let arg = || vec![json!({ "payload": 1 })];
    let replies = vec![
        ctx.send_attachment(arg()),
        ctx.send_image(arg()),
        ctx.send_audio(arg()),
        ctx.send_video(arg()),
        ctx.send_file(arg()),
        ctx.send_quick_replies(arg()),
        ctx.send_generic_template(arg()),
        ctx.send_button_template(arg()),
        ctx.send_list_template(arg()),
        ctx.send_receipt_template(arg()),
        ctx.send_airline_boarding_pass_template(arg()),
        ctx.send_airline_checkin_template(arg()),
        ctx.send_airline_itinerary_template(arg()),
        ctx.send_airline_flight_update_template(arg()),
    ];
    for reply in replies {
        assert_eq!(
            reply.await.unwrap(),
            SendOutcome::Delivered(json!({ "recipient_id": "psid-7" }))
        );
    }
    assert_eq!(diagnostics.warnings(), 0);

    ctx.send_airline_flight_update_template_with_delay(Duration::from_millis(5), arg())
        .await
        .unwrap();
    assert_eq!(diagnostics.warnings(), 1);

    let sent: Vec<String> = client
        .calls()
        .into_iter()
        .filter(|c| !c.op.starts_with("typing"))
        .map(|c| c.op)
        .collect();
    let mut expected: Vec<String> = SendMethod::ALL.iter().map(|m| m.name().to_string()).collect();
    expected.push("sendAirlineFlightUpdateTemplate".to_string());
    assert_eq!(sent, expected);
    assert!(client.calls().iter().all(|c| c.user_id == "psid-7"));
    assert!(
        client
            .calls()
            .iter()
            .filter(|c| !c.op.starts_with("typing"))
            .all(|c| c.args == arg())
    );
}

#[tokio::test(start_paused = true)]
async fn session_less_context_never_touches_the_client() {
    let (ctx, client, diagnostics) = context_for(None);
    assert_eq!(ctx.platform(), "messenger");

    assert!(ctx.send_text("hi", None).await.unwrap().is_skipped());
    assert!(ctx.send_video(vec![json!("v.mp4")]).await.unwrap().is_skipped());
    assert!(ctx.typing(Duration::from_secs(1)).await.unwrap().is_skipped());

    assert_eq!(diagnostics.warnings(), 3);
    assert!(client.calls().is_empty());
    assert_eq!(ctx.queue_state(), QueueState::Idle);
}

#[tokio::test(start_paused = true)]
async fn separate_conversations_pace_independently() {
    let (first, first_client, _) = context_for(Some("psid-1"));
    let (second, second_client, _) = context_for(Some("psid-2"));
    let started = Instant::now();

    let (a, b) = tokio::join!(first.send_text("x", None), second.send_text("y", None));
    a.unwrap();
    b.unwrap();

    // Both ran in parallel: each finished roughly one delay after start,
    // not one after the other.
    let first_send = first_client.calls()[1].at - started;
    let second_send = second_client.calls()[1].at - started;
    assert!(first_send < Duration::from_millis(1500));
    assert!(second_send < Duration::from_millis(1500));
}
