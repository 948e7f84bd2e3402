use {
    serde::Deserialize,
    serde_json::Value,
    url::Url,
};

/// Inbound activity envelope from the Connector webhook.
///
/// Every field is optional at the serde layer; the handler decides which
/// are required per activity type. `from`/`recipient` stay loosely typed so
/// identity parsing keeps its defaulting rules.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "serviceUrl")]
    pub service_url: Option<String>,
    pub from: Option<Value>,
    pub recipient: Option<Value>,
    pub conversation: Option<ActivityConversation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityConversation {
    pub id: Option<String>,
    #[serde(rename = "isGroup", default)]
    pub is_group: bool,
}

/// Activity types the bridge reacts to; everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Message,
    ConversationUpdate,
    ContactRelationUpdate,
    Other,
}

impl InboundActivity {
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self.activity_type.as_str() {
            "message" => ActivityKind::Message,
            "conversationUpdate" => ActivityKind::ConversationUpdate,
            "contactRelationUpdate" => ActivityKind::ContactRelationUpdate,
            _ => ActivityKind::Other,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.conversation.as_ref().is_some_and(|c| c.is_group)
    }
}

/// An outbound Connector activity, ready to POST: the callback URL plus the
/// JSON payload. Building one performs no I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundActivity {
    pub url: Url,
    pub payload: Value,
}
