use reqwest::StatusCode;

/// Crate-wide result type for Connector API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for the outbound half of the bridge.
///
/// `status` is `None` when the request failed at the transport level
/// (connect error, timeout) before any HTTP status was received.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token issuance failed; authenticated calls cannot proceed until a
    /// later refresh succeeds.
    #[error("token request failed: {detail}")]
    Auth { status: Option<u16>, detail: String },

    /// The Connector API rejected a conversation-creation request.
    #[error("conversation creation failed: {detail}")]
    Provisioning { status: Option<u16>, detail: String },

    /// The Connector API rejected an outbound activity POST.
    #[error("activity delivery failed: {detail}")]
    Delivery { status: Option<u16>, detail: String },

    /// A reply or feedback activity was requested for a message that
    /// carries no conversation context.
    #[error("message carries no conversation context")]
    NoConversation,

    /// Channel state error (unknown channel, malformed envelope).
    #[error(transparent)]
    Channel(#[from] botbridge_channels::Error),
}

impl Error {
    #[must_use]
    pub fn auth_rejected(status: StatusCode, body: impl std::fmt::Display) -> Self {
        Self::Auth {
            status: Some(status.as_u16()),
            detail: format!("status {status}: {body}"),
        }
    }

    #[must_use]
    pub fn auth_transport(source: reqwest::Error) -> Self {
        Self::Auth {
            status: None,
            detail: source.to_string(),
        }
    }

    #[must_use]
    pub fn provisioning_rejected(status: StatusCode, body: impl std::fmt::Display) -> Self {
        Self::Provisioning {
            status: Some(status.as_u16()),
            detail: format!("status {status}: {body}"),
        }
    }

    #[must_use]
    pub fn provisioning_transport(source: reqwest::Error) -> Self {
        Self::Provisioning {
            status: None,
            detail: source.to_string(),
        }
    }

    #[must_use]
    pub fn delivery_rejected(status: StatusCode, body: impl std::fmt::Display) -> Self {
        Self::Delivery {
            status: Some(status.as_u16()),
            detail: format!("status {status}: {body}"),
        }
    }

    #[must_use]
    pub fn delivery_transport(source: reqwest::Error) -> Self {
        Self::Delivery {
            status: None,
            detail: source.to_string(),
        }
    }
}
