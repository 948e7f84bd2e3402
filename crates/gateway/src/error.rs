use {
    axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    tracing::warn,
};

use {botbridge_channels::Error as ChannelError, botbridge_connector::Error as ConnectorError};

/// Webhook request failure, mapped onto an HTTP response.
///
/// Malformed envelopes are the client's fault (400); anything else that
/// leaks this far is ours (500). Either way the error stays contained to
/// the one request.
#[derive(Debug)]
pub struct WebhookError(ConnectorError);

impl From<ConnectorError> for WebhookError {
    fn from(err: ConnectorError) -> Self {
        Self(err)
    }
}

impl From<ChannelError> for WebhookError {
    fn from(err: ChannelError) -> Self {
        Self(ConnectorError::Channel(err))
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ConnectorError::Channel(ChannelError::MalformedActivity { .. }) => {
                StatusCode::BAD_REQUEST
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = status.as_u16(), error = %self.0, "webhook request rejected");
        (status, self.0.to_string()).into_response()
    }
}
