use crate::{conversation::ConversationRef, identity::Identity};

/// Normalized message exchanged with the host.
///
/// The conversation attachment is an explicit optional field rather than an
/// open-ended extras bag: it is the only routing context the bridge reads or
/// writes. A message without one is addressed by `to` alone and triggers
/// proactive conversation provisioning on send.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub body: String,
    pub from: Identity,
    pub to: Identity,
    pub conversation: Option<ConversationRef>,
}

impl Message {
    #[must_use]
    pub fn new(body: impl Into<String>, from: Identity, to: Identity) -> Self {
        Self {
            body: body.into(),
            from,
            to,
            conversation: None,
        }
    }

    #[must_use]
    pub fn with_conversation(mut self, conversation: ConversationRef) -> Self {
        self.conversation = Some(conversation);
        self
    }

    /// Build a reply carrying this message's routing context with a new body.
    #[must_use]
    pub fn reply_with(&self, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            from: self.from.clone(),
            to: self.to.clone(),
            conversation: self.conversation.clone(),
        }
    }
}
