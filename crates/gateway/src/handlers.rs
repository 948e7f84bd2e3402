use {
    axum::{Json, extract::State, http::StatusCode},
    serde_json::Value,
    tracing::{debug, warn},
};

use {
    botbridge_channels::{ConversationRef, Error as ChannelError, Identity, Message},
    botbridge_connector::{ActivityKind, InboundActivity},
};

use crate::{error::WebhookError, state::AppState};

/// Platform liveness probe. Always succeeds; the body carries no meaning.
pub async fn probe() -> StatusCode {
    StatusCode::OK
}

/// Webhook entry point: parse the activity envelope, update channel state,
/// and hand normalized messages to the host.
pub async fn inbound(
    State(state): State<AppState>,
    Json(envelope): Json<Value>,
) -> Result<StatusCode, WebhookError> {
    let activity: InboundActivity = serde_json::from_value(envelope.clone())
        .map_err(|_| ChannelError::malformed("type"))?;
    debug!(
        activity_type = activity.activity_type,
        channel_id = activity.channel_id.as_deref().unwrap_or(""),
        "inbound activity"
    );

    match activity.kind() {
        ActivityKind::Message => handle_message(&state, &envelope, &activity).await?,
        ActivityKind::ConversationUpdate | ActivityKind::ContactRelationUpdate => {
            handle_roster_update(&state, &activity)?;
        },
        ActivityKind::Other => {
            // Unrecognized envelopes are acknowledged and dropped.
            debug!(activity_type = activity.activity_type, "ignoring activity");
        },
    }

    Ok(StatusCode::OK)
}

async fn handle_message(
    state: &AppState,
    envelope: &Value,
    activity: &InboundActivity,
) -> Result<(), WebhookError> {
    let channel_id = activity
        .channel_id
        .as_deref()
        .ok_or_else(|| ChannelError::malformed("channelId"))?;
    let from_subject = activity
        .from
        .as_ref()
        .ok_or_else(|| ChannelError::malformed("from"))?;
    let recipient_subject = activity
        .recipient
        .as_ref()
        .ok_or_else(|| ChannelError::malformed("recipient"))?;
    let service_url = activity
        .service_url
        .as_deref()
        .ok_or_else(|| ChannelError::malformed("serviceUrl"))?;
    // Validates conversation.id, id, serviceUrl, and from.
    let conversation = ConversationRef::from_envelope(envelope)?;

    let from = Identity::parse(from_subject, Some(channel_id));
    let to = Identity::parse(recipient_subject, Some(channel_id));

    // Group conversations bypass routing state entirely; there is no single
    // user to key the conversation cache on.
    if !activity.is_group() {
        state
            .registry
            .upsert_channel(channel_id, service_url, Some(&to));
        state
            .registry
            .cache_conversation(channel_id, &from.id, conversation.clone())?;
    }

    let body = activity.text.clone().unwrap_or_default();
    let message = Message::new(body, from, to).with_conversation(conversation);

    // Typing feedback goes out before the host sees the message. A delivery
    // failure here must not cost us the inbound message.
    if let Err(e) = state.bridge.send_feedback(&message).await {
        warn!(channel_id, error = %e, "typing feedback failed");
    }

    state.sink.on_message(message).await;
    Ok(())
}

/// `conversationUpdate` / `contactRelationUpdate`: refresh the channel's
/// service URL and bot identity; no message reaches the host.
fn handle_roster_update(state: &AppState, activity: &InboundActivity) -> Result<(), WebhookError> {
    let channel_id = activity
        .channel_id
        .as_deref()
        .ok_or_else(|| ChannelError::malformed("channelId"))?;
    let service_url = activity
        .service_url
        .as_deref()
        .ok_or_else(|| ChannelError::malformed("serviceUrl"))?;
    let recipient = activity
        .recipient
        .as_ref()
        .ok_or_else(|| ChannelError::malformed("recipient"))?;

    let bot = Identity::parse(recipient, Some(channel_id));
    state.registry.upsert_channel(channel_id, service_url, Some(&bot));
    Ok(())
}
