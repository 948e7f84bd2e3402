use std::{
    collections::HashMap,
    sync::RwLock,
};

use tracing::debug;

use crate::{
    conversation::ConversationRef,
    error::{Error, Result},
    identity::Identity,
};

/// Routing state for one messaging platform (Skype, Telegram, ...).
///
/// `service_url` follows the most recent inbound activity; the conversation
/// cache holds at most one entry per user and is never evicted for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct Channel {
    pub service_url: String,
    pub bot_identity: Identity,
    conversations: HashMap<String, ConversationRef>,
}

impl Channel {
    #[must_use]
    pub fn new(service_url: impl Into<String>, bot_identity: Identity) -> Self {
        Self {
            service_url: service_url.into(),
            bot_identity,
            conversations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn conversation(&self, user_id: &str) -> Option<&ConversationRef> {
        self.conversations.get(user_id)
    }

    #[must_use]
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }
}

/// Process-wide map of channel id → routing state, shared across concurrent
/// webhook handlers and the outbound path.
///
/// All mutation happens under the internal write lock; reads hand out
/// clones so no lock is ever held across network I/O.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    inner: RwLock<HashMap<String, Channel>>,
}

impl ChannelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register channels from static configuration.
    pub fn seed<I>(&self, channels: I)
    where
        I: IntoIterator<Item = (String, String, Identity)>,
    {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        for (channel_id, service_url, bot_identity) in channels {
            debug!(channel_id = %channel_id, service_url = %service_url, "seeding channel");
            inner.insert(channel_id, Channel::new(service_url, bot_identity));
        }
    }

    /// Snapshot of a channel's current state.
    #[must_use]
    pub fn get_channel(&self, channel_id: &str) -> Option<Channel> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.get(channel_id).cloned()
    }

    /// Create the channel if absent; otherwise update its service URL when
    /// the platform endpoint has moved (last-write-wins). The bot identity
    /// is only replaced when one is passed.
    pub fn upsert_channel(
        &self,
        channel_id: &str,
        service_url: &str,
        bot_identity: Option<&Identity>,
    ) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match inner.get_mut(channel_id) {
            Some(channel) => {
                if channel.service_url != service_url {
                    debug!(channel_id, service_url, "channel service URL moved");
                    channel.service_url = service_url.to_string();
                }
                if let Some(identity) = bot_identity {
                    channel.bot_identity = identity.clone();
                }
            },
            None => {
                debug!(channel_id, service_url, "registering channel");
                let bot_identity = bot_identity
                    .cloned()
                    .unwrap_or_else(|| Identity::new(crate::NOT_FOUND, crate::NOT_FOUND));
                inner.insert(
                    channel_id.to_string(),
                    Channel::new(service_url, bot_identity),
                );
            },
        }
    }

    /// Cache the conversation for `(channel_id, user_id)`, overwriting any
    /// prior entry. The channel must already be registered.
    pub fn cache_conversation(
        &self,
        channel_id: &str,
        user_id: &str,
        conversation: ConversationRef,
    ) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let channel = inner
            .get_mut(channel_id)
            .ok_or_else(|| Error::unknown_channel(channel_id))?;
        channel
            .conversations
            .insert(user_id.to_string(), conversation);
        Ok(())
    }

    #[must_use]
    pub fn lookup_conversation(&self, channel_id: &str, user_id: &str) -> Option<ConversationRef> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .get(channel_id)
            .and_then(|channel| channel.conversations.get(user_id))
            .cloned()
    }

    /// Registered channel ids, for diagnostics.
    #[must_use]
    pub fn channel_ids(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.keys().cloned().collect()
    }
}
