use {
    serde_json::{Value, json},
    url::Url,
};

use crate::{
    error::{Error, Result},
    identity::Identity,
};

/// Routable conversation metadata lifted from an inbound activity envelope
/// (or synthesized for a freshly provisioned conversation).
///
/// Never mutated after construction; treated as an opaque attachment on a
/// [`Message`](crate::Message). The two callback URLs are pure functions of
/// the stored fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRef {
    service_url: Url,
    conversation_id: String,
    activity_id: String,
    from: Identity,
}

impl ConversationRef {
    /// Build a reference from already-validated parts.
    ///
    /// Fails with [`Error::MalformedActivity`] when `service_url` is not an
    /// absolute base URL.
    pub fn new(
        service_url: &str,
        conversation_id: impl Into<String>,
        activity_id: impl Into<String>,
        from: Identity,
    ) -> Result<Self> {
        let service_url = Url::parse(service_url).map_err(|_| Error::malformed("serviceUrl"))?;
        if service_url.cannot_be_a_base() {
            return Err(Error::malformed("serviceUrl"));
        }
        Ok(Self {
            service_url,
            conversation_id: conversation_id.into(),
            activity_id: activity_id.into(),
            from,
        })
    }

    /// Build a reference from an inbound activity envelope.
    ///
    /// Requires `conversation.id`, `id`, `serviceUrl`, and `from`; any
    /// missing field yields [`Error::MalformedActivity`].
    pub fn from_envelope(envelope: &Value) -> Result<Self> {
        let conversation_id = envelope
            .get("conversation")
            .and_then(|c| c.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed("conversation.id"))?;
        let activity_id = envelope
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed("id"))?;
        let service_url = envelope
            .get("serviceUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::malformed("serviceUrl"))?;
        let from = envelope
            .get("from")
            .filter(|f| f.is_object())
            .ok_or_else(|| Error::malformed("from"))?;

        Self::new(
            service_url,
            conversation_id,
            activity_id,
            Identity::parse(from, None),
        )
    }

    #[must_use]
    pub fn service_url(&self) -> &str {
        self.service_url.as_str()
    }

    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    #[must_use]
    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    /// The sender recorded when this conversation was first seen or created.
    #[must_use]
    pub fn from(&self) -> &Identity {
        &self.from
    }

    /// The `conversation` object embedded in outbound payloads.
    #[must_use]
    pub fn conversation(&self) -> Value {
        json!({ "id": self.conversation_id })
    }

    /// Callback URL for replying to the originating activity.
    #[must_use]
    pub fn reply_url(&self) -> Url {
        let mut url = self.service_url.clone();
        url.set_path(&format!(
            "/v3/conversations/{}/activities/{}",
            self.conversation_id, self.activity_id
        ));
        url
    }

    /// Callback URL for posting a new activity into the conversation.
    #[must_use]
    pub fn send_url(&self) -> Url {
        let mut url = self.service_url.clone();
        url.set_path(&format!(
            "/v3/conversations/{}/activities",
            self.conversation_id
        ));
        url
    }
}
