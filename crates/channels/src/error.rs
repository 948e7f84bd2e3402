/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for channel state and inbound envelope handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inbound activity payload is missing a required field.
    #[error("malformed activity: missing field `{field}`")]
    MalformedActivity { field: String },

    /// A requested channel ID has never been registered.
    #[error("unknown channel: {channel_id}")]
    UnknownChannel { channel_id: String },
}

impl Error {
    #[must_use]
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedActivity {
            field: field.into(),
        }
    }

    #[must_use]
    pub fn unknown_channel(channel_id: impl std::fmt::Display) -> Self {
        Self::UnknownChannel {
            channel_id: channel_id.to_string(),
        }
    }
}
