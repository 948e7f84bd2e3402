use std::sync::Arc;

use tracing::warn;

use botbridge_channels::{ChannelRegistry, Error as ChannelError, Identity, Message};

use crate::{
    auth::TokenManager,
    error::{Error, Result},
    outbound::ActivityDispatcher,
    provision::ConversationProvisioner,
};

/// Outbound half of the bridge: routes host messages to the Connector API
/// as replies or proactive sends.
pub struct Bridge {
    registry: Arc<ChannelRegistry>,
    dispatcher: ActivityDispatcher,
    provisioner: ConversationProvisioner,
}

impl Bridge {
    #[must_use]
    pub fn new(registry: Arc<ChannelRegistry>, tokens: Arc<TokenManager>) -> Self {
        Self {
            dispatcher: ActivityDispatcher::new(Arc::clone(&tokens)),
            provisioner: ConversationProvisioner::new(Arc::clone(&registry), Arc::clone(&tokens)),
            registry,
        }
    }

    /// Deliver an outbound message.
    ///
    /// A message carrying conversation context becomes a reply to that
    /// activity. Otherwise the recipient address is resolved to a channel +
    /// user pair, a conversation is looked up or provisioned, and the
    /// message goes out as a proactive send framed from the channel's bot
    /// identity. A message whose recipient cannot be resolved is logged and
    /// dropped; provisioning and delivery failures propagate.
    pub async fn send_message(&self, message: Message) -> Result<()> {
        let activity = if message.conversation.is_some() {
            ActivityDispatcher::build_reply(&message)?
        } else {
            let Some((channel_id, user_id)) = resolve_address(&message.to) else {
                warn!(to = %message.to, "cannot determine conversation for outbound message");
                return Ok(());
            };
            let conversation = self
                .provisioner
                .ensure_conversation(&channel_id, &user_id)
                .await?;
            let channel = self
                .registry
                .get_channel(&channel_id)
                .ok_or_else(|| ChannelError::unknown_channel(&channel_id))?;
            let proactive = Message {
                body: message.body,
                from: channel.bot_identity,
                to: Identity::new(user_id, "User"),
                conversation: Some(conversation),
            };
            ActivityDispatcher::build_send(&proactive)?
        };

        self.dispatcher.send(&activity).await
    }

    /// Emit a typing indicator for an inbound message. Missing conversation
    /// context is logged and dropped, never escalated.
    pub async fn send_feedback(&self, message: &Message) -> Result<()> {
        match ActivityDispatcher::build_feedback(message) {
            Ok(activity) => self.dispatcher.send(&activity).await,
            Err(Error::NoConversation) => {
                warn!(from = %message.from, "cannot determine conversation for typing feedback");
                Ok(())
            },
            Err(e) => Err(e),
        }
    }
}

/// Resolve a proactive recipient to `(channel_id, user_id)`: an explicit
/// channel scope wins, else the composite `channel.user` id form.
fn resolve_address(to: &Identity) -> Option<(String, String)> {
    if let Some(channel) = &to.channel {
        return Some((channel.clone(), to.id.clone()));
    }
    Identity::split_address(&to.id).map(|(channel, user)| (channel.to_string(), user.to_string()))
}
