use {
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
};

/// Placeholder used when an inbound subject omits `id` or `name`.
pub const NOT_FOUND: &str = "<not found>";

/// A channel-scoped actor (user or bot) parsed from an inbound subject.
///
/// Immutable after construction. Two identities are equal iff their
/// canonical string forms match, which is equivalent to structural
/// equality of `(id, name, channel)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            channel: None,
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Parse an identity from a loosely-typed subject.
    ///
    /// Accepts a JSON object or a string containing serialized JSON.
    /// Missing `id`/`name` default to [`NOT_FOUND`]; this never fails.
    #[must_use]
    pub fn parse(subject: &Value, channel: Option<&str>) -> Self {
        let parsed;
        let obj = match subject {
            Value::String(raw) => {
                parsed = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
                &parsed
            },
            other => other,
        };

        let field = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or(NOT_FOUND)
                .to_string()
        };

        Self {
            id: field("id"),
            name: field("name"),
            channel: channel.map(str::to_string),
        }
    }

    /// Deterministic JSON form of `(id, name, channel)` used for equality
    /// comparisons across instances. Keys are emitted in sorted order, so
    /// the same identity always yields byte-identical output.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        json!({
            "id": self.id,
            "name": self.name,
            "channel": self.channel,
        })
        .to_string()
    }

    /// The `{id, name}` object embedded in outbound activity payloads.
    #[must_use]
    pub fn subject(&self) -> Value {
        json!({ "id": self.id, "name": self.name })
    }

    /// Composite `channel.user` address for proactive sends.
    ///
    /// When no channel is attached the bare id is returned.
    #[must_use]
    pub fn address(&self) -> String {
        match &self.channel {
            Some(channel) => format!("{channel}.{}", self.id),
            None => self.id.clone(),
        }
    }

    /// Split a composite `channel.user` address into its parts.
    #[must_use]
    pub fn split_address(address: &str) -> Option<(&str, &str)> {
        address
            .split_once('.')
            .filter(|(channel, user)| !channel.is_empty() && !user.is_empty())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_complete_subject() {
        let subject = json!({"id": "u1", "name": "Alice"});
        let identity = Identity::parse(&subject, Some("telegram"));
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.channel.as_deref(), Some("telegram"));
    }

    #[test]
    fn parse_missing_fields_uses_sentinel() {
        let identity = Identity::parse(&json!({}), None);
        assert_eq!(identity.id, NOT_FOUND);
        assert_eq!(identity.name, NOT_FOUND);
        assert_eq!(identity.channel, None);
    }

    #[test]
    fn parse_from_json_string() {
        let subject = Value::String(r#"{"id":"u2","name":"Bob"}"#.into());
        let identity = Identity::parse(&subject, None);
        assert_eq!(identity.id, "u2");
        assert_eq!(identity.name, "Bob");
    }

    #[test]
    fn parse_garbage_string_never_fails() {
        let identity = Identity::parse(&Value::String("not json".into()), None);
        assert_eq!(identity.id, NOT_FOUND);
        assert_eq!(identity.name, NOT_FOUND);
    }

    #[test]
    fn canonical_string_equality() {
        let a = Identity::parse(&json!({"id": "u1", "name": "Alice"}), Some("skype"));
        let b = Identity::new("u1", "Alice").with_channel("skype");
        assert_eq!(a.canonical_string(), b.canonical_string());
        assert_eq!(a, b);

        let c = Identity::new("u1", "Alice").with_channel("telegram");
        assert_ne!(a.canonical_string(), c.canonical_string());
        assert_ne!(a, c);
    }

    #[test]
    fn canonical_string_is_deterministic() {
        let identity = Identity::new("u1", "Alice");
        assert_eq!(identity.canonical_string(), identity.canonical_string());
    }

    #[test]
    fn subject_contains_only_id_and_name() {
        let identity = Identity::new("bot1", "Bot").with_channel("skype");
        assert_eq!(identity.subject(), json!({"id": "bot1", "name": "Bot"}));
    }

    #[test]
    fn address_round_trip() {
        let identity = Identity::new("u1", "Alice").with_channel("telegram");
        assert_eq!(identity.address(), "telegram.u1");
        assert_eq!(
            Identity::split_address(&identity.address()),
            Some(("telegram", "u1"))
        );
    }

    #[test]
    fn split_address_rejects_bare_ids() {
        assert_eq!(Identity::split_address("no-dot"), None);
        assert_eq!(Identity::split_address(".u1"), None);
        assert_eq!(Identity::split_address("telegram."), None);
    }
}
