use std::sync::Arc;

use {
    serde::Deserialize,
    serde_json::json,
    tracing::{debug, warn},
};

use botbridge_channels::{ChannelRegistry, ConversationRef, Error as ChannelError, Identity};

use crate::{
    auth::TokenManager,
    error::{Error, Result},
};

#[derive(Debug, Deserialize)]
struct CreatedConversation {
    id: String,
}

/// Creates proactive conversations through the Connector API when no cached
/// conversation exists for a channel + user pair.
pub struct ConversationProvisioner {
    registry: Arc<ChannelRegistry>,
    tokens: Arc<TokenManager>,
    client: reqwest::Client,
}

impl ConversationProvisioner {
    #[must_use]
    pub fn new(registry: Arc<ChannelRegistry>, tokens: Arc<TokenManager>) -> Self {
        Self {
            registry,
            tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Return the cached conversation for `(channel_id, user_id)`, creating
    /// one via `POST {serviceUrl}/v3/conversations` on a cache miss.
    ///
    /// The registry lock is never held across the network call: the channel
    /// snapshot is taken up front and the new reference cached afterwards.
    pub async fn ensure_conversation(
        &self,
        channel_id: &str,
        user_id: &str,
    ) -> Result<ConversationRef> {
        if let Some(conversation) = self.registry.lookup_conversation(channel_id, user_id) {
            return Ok(conversation);
        }

        let channel = self
            .registry
            .get_channel(channel_id)
            .ok_or_else(|| ChannelError::unknown_channel(channel_id))?;

        let url = creation_url(&channel.service_url)?;
        let payload = json!({
            "bot": { "id": channel.bot_identity.id },
            "members": [{ "id": user_id }],
        });

        debug!(channel_id, user_id, url = %url, "creating proactive conversation");
        let mut request = self.client.post(url).json(&payload);
        if !self.tokens.emulator_mode() {
            request = request.bearer_auth(self.tokens.ensure_token().await?);
        }

        let resp = request.send().await.map_err(Error::provisioning_transport)?;
        let status = resp.status();
        if !(200..300).contains(&status.as_u16()) {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                channel_id,
                user_id,
                status = status.as_u16(),
                body,
                "conversation creation rejected"
            );
            return Err(Error::provisioning_rejected(status, body));
        }

        let created: CreatedConversation =
            resp.json().await.map_err(Error::provisioning_transport)?;

        // A fresh proactive conversation has no prior activity to reply to,
        // so the activity id and conversation id are the same value.
        let conversation = ConversationRef::new(
            &channel.service_url,
            &created.id,
            &created.id,
            Identity::new(user_id, "User"),
        )?;
        self.registry
            .cache_conversation(channel_id, user_id, conversation.clone())?;
        debug!(
            channel_id,
            user_id,
            conversation_id = created.id,
            "conversation provisioned"
        );
        Ok(conversation)
    }
}

fn creation_url(service_url: &str) -> Result<url::Url> {
    let mut url =
        url::Url::parse(service_url).map_err(|_| ChannelError::malformed("serviceUrl"))?;
    url.set_path("/v3/conversations");
    Ok(url)
}
