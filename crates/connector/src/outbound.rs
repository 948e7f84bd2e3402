use std::sync::Arc;

use {
    serde_json::json,
    tracing::{debug, warn},
};

use botbridge_channels::Message;

use crate::{
    activity::OutboundActivity,
    auth::TokenManager,
    error::{Error, Result},
};

/// Builds outbound activity payloads and performs the signed POSTs.
///
/// The three builders are pure: the same message yields byte-identical
/// payloads on every call (no timestamps, no generated ids).
pub struct ActivityDispatcher {
    client: reqwest::Client,
    tokens: Arc<TokenManager>,
}

impl ActivityDispatcher {
    #[must_use]
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
        }
    }

    /// Reply to the activity the message's conversation points at.
    ///
    /// Replies are framed from the bot's perspective: `from` is the
    /// message's recipient and `recipient` its original sender. This is the
    /// inverse of [`build_send`](Self::build_send) and intentional.
    pub fn build_reply(message: &Message) -> Result<OutboundActivity> {
        let conversation = message.conversation.as_ref().ok_or(Error::NoConversation)?;
        Ok(OutboundActivity {
            url: conversation.reply_url(),
            payload: json!({
                "type": "message",
                "conversation": conversation.conversation(),
                "from": message.to.subject(),
                "recipient": message.from.subject(),
                "replyToId": conversation.conversation_id(),
                "text": message.body,
            }),
        })
    }

    /// Proactive send into an existing conversation; the caller has already
    /// set `from` to the channel's bot identity, so no swap happens here.
    pub fn build_send(message: &Message) -> Result<OutboundActivity> {
        let conversation = message.conversation.as_ref().ok_or(Error::NoConversation)?;
        Ok(OutboundActivity {
            url: conversation.send_url(),
            payload: json!({
                "type": "message",
                "conversation": conversation.conversation(),
                "from": message.from.subject(),
                "recipient": message.to.subject(),
                "replyToId": conversation.conversation_id(),
                "text": message.body,
            }),
        })
    }

    /// Typing indicator posted back at the originating activity.
    pub fn build_feedback(message: &Message) -> Result<OutboundActivity> {
        let conversation = message.conversation.as_ref().ok_or(Error::NoConversation)?;
        Ok(OutboundActivity {
            url: conversation.reply_url(),
            payload: json!({
                "type": "typing",
                "conversation": conversation.conversation(),
                "from": message.to.subject(),
                "replyToId": conversation.conversation_id(),
            }),
        })
    }

    /// POST the activity to its callback URL, attaching the bearer token
    /// unless running in emulator mode. A response status ≥ 400 is logged
    /// and surfaced as [`Error::Delivery`]; there is no automatic retry.
    pub async fn send(&self, activity: &OutboundActivity) -> Result<()> {
        let mut request = self.client.post(activity.url.clone()).json(&activity.payload);
        if !self.tokens.emulator_mode() {
            request = request.bearer_auth(self.tokens.ensure_token().await?);
        }

        let resp = request.send().await.map_err(Error::delivery_transport)?;
        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body,
                url = %activity.url,
                "activity delivery rejected"
            );
            return Err(Error::delivery_rejected(status, body));
        }

        debug!(url = %activity.url, "activity delivered");
        Ok(())
    }
}
