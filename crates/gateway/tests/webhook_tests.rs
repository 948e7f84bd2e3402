#![allow(clippy::unwrap_used, clippy::expect_used)]
use std::sync::Arc;

use {
    async_trait::async_trait,
    axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    },
    serde_json::{Value, json},
    tower::ServiceExt,
};

use {
    botbridge_channels::{ChannelRegistry, HostSink, Message},
    botbridge_connector::{Bridge, TokenManager},
    botbridge_gateway::{AppState, build_app},
};

/// Host sink that records every delivered message.
#[derive(Default)]
struct RecordingSink {
    messages: tokio::sync::Mutex<Vec<Message>>,
}

#[async_trait]
impl HostSink for RecordingSink {
    async fn on_message(&self, message: Message) {
        self.messages.lock().await.push(message);
    }
}

fn test_app() -> (Router, Arc<ChannelRegistry>, Arc<RecordingSink>) {
    let registry = Arc::new(ChannelRegistry::new());
    let tokens = Arc::new(TokenManager::new(None));
    let bridge = Arc::new(Bridge::new(Arc::clone(&registry), tokens));
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(Arc::clone(&registry), bridge, Arc::clone(&sink) as Arc<dyn HostSink>);
    (build_app(state), registry, sink)
}

async fn post_activity(app: &Router, envelope: &Value) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/botframework")
        .header("content-type", "application/json")
        .body(Body::from(envelope.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

fn message_envelope(service_url: &str) -> Value {
    json!({
        "type": "message",
        "channelId": "telegram",
        "from": { "id": "u1", "name": "Alice" },
        "recipient": { "id": "bot1", "name": "Bot" },
        "conversation": { "id": "c1" },
        "id": "a1",
        "serviceUrl": service_url,
        "text": "hi",
    })
}

#[tokio::test]
async fn inbound_message_updates_registry_and_reaches_host() {
    let mut server = mockito::Server::new_async().await;
    let typing = server
        .mock("POST", "/v3/conversations/c1/activities/a1")
        .match_body(mockito::Matcher::PartialJson(json!({ "type": "typing" })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let (app, registry, sink) = test_app();
    let status = post_activity(&app, &message_envelope(&server.url())).await;
    assert_eq!(status, StatusCode::OK);

    // Registry learned the channel and cached the conversation.
    let channel = registry.get_channel("telegram").unwrap();
    assert_eq!(channel.service_url, server.url());
    assert_eq!(channel.bot_identity.id, "bot1");
    let conversation = registry.lookup_conversation("telegram", "u1").unwrap();
    assert_eq!(conversation.conversation_id(), "c1");
    assert_eq!(conversation.activity_id(), "a1");

    // Host callback invoked exactly once with the normalized message.
    let messages = sink.messages.lock().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "hi");
    assert_eq!(messages[0].from.id, "u1");
    assert_eq!(messages[0].from.channel.as_deref(), Some("telegram"));
    assert_eq!(messages[0].to.id, "bot1");
    assert!(messages[0].conversation.is_some());

    // Typing feedback was POSTed to the reply URL.
    typing.assert_async().await;
}

#[tokio::test]
async fn missing_required_field_is_rejected_without_callback() {
    let (app, registry, sink) = test_app();

    for field in ["channelId", "from", "recipient", "conversation", "id", "serviceUrl"] {
        let mut envelope = message_envelope("https://example.invalid");
        envelope.as_object_mut().unwrap().remove(field);
        let status = post_activity(&app, &envelope).await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "expected 400 without `{field}`"
        );
    }

    assert!(sink.messages.lock().await.is_empty());
    assert!(registry.get_channel("telegram").is_none());
}

#[tokio::test]
async fn message_without_text_has_empty_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v3/conversations/c1/activities/a1")
        .with_status(200)
        .create_async()
        .await;

    let (app, _registry, sink) = test_app();
    let mut envelope = message_envelope(&server.url());
    envelope.as_object_mut().unwrap().remove("text");

    assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    let messages = sink.messages.lock().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, "");
}

#[tokio::test]
async fn group_message_bypasses_registry_but_reaches_host() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v3/conversations/c1/activities/a1")
        .with_status(200)
        .create_async()
        .await;

    let (app, registry, sink) = test_app();
    let mut envelope = message_envelope(&server.url());
    envelope["conversation"] = json!({ "id": "c1", "isGroup": true });

    assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    assert!(registry.get_channel("telegram").is_none());
    assert!(registry.lookup_conversation("telegram", "u1").is_none());
    assert_eq!(sink.messages.lock().await.len(), 1);
}

#[tokio::test]
async fn failed_typing_feedback_does_not_drop_the_message() {
    // serviceUrl points at a closed port: the typing POST fails at the
    // transport level, the inbound message must still reach the host.
    let (app, _registry, sink) = test_app();
    let envelope = message_envelope("http://127.0.0.1:1");

    assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    assert_eq!(sink.messages.lock().await.len(), 1);
}

#[tokio::test]
async fn conversation_update_registers_channel_without_callback() {
    let (app, registry, sink) = test_app();
    let envelope = json!({
        "type": "conversationUpdate",
        "channelId": "skype",
        "serviceUrl": "https://smba.trafficmanager.net/apis",
        "recipient": { "id": "28:bot", "name": "mybot" },
    });

    assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    let channel = registry.get_channel("skype").unwrap();
    assert_eq!(channel.service_url, "https://smba.trafficmanager.net/apis");
    assert_eq!(channel.bot_identity.id, "28:bot");
    assert!(sink.messages.lock().await.is_empty());
}

#[tokio::test]
async fn service_url_migration_is_last_write_wins() {
    let (app, registry, _sink) = test_app();
    for url in ["https://one.example", "https://two.example"] {
        let envelope = json!({
            "type": "conversationUpdate",
            "channelId": "skype",
            "serviceUrl": url,
            "recipient": { "id": "28:bot", "name": "mybot" },
        });
        assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    }
    assert_eq!(
        registry.get_channel("skype").unwrap().service_url,
        "https://two.example"
    );
}

#[tokio::test]
async fn unknown_activity_type_is_ignored() {
    let (app, registry, sink) = test_app();
    let envelope = json!({ "type": "ping", "channelId": "telegram" });

    assert_eq!(post_activity(&app, &envelope).await, StatusCode::OK);
    assert!(registry.get_channel("telegram").is_none());
    assert!(sink.messages.lock().await.is_empty());
}

#[tokio::test]
async fn probe_always_succeeds() {
    let (app, _registry, _sink) = test_app();
    let request = Request::builder()
        .method("GET")
        .uri("/botframework")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
