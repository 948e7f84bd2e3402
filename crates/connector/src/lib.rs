//! Bot Framework Connector protocol client: token lifecycle, activity
//! payload construction, delivery, and proactive conversation provisioning.

pub mod activity;
pub mod auth;
pub mod bridge;
pub mod error;
pub mod outbound;
pub mod provision;

pub use {
    activity::{ActivityKind, InboundActivity, OutboundActivity},
    auth::{AppCredentials, DEFAULT_OAUTH_SCOPE, DEFAULT_OAUTH_TENANT, TokenManager},
    bridge::Bridge,
    error::{Error, Result},
    outbound::ActivityDispatcher,
    provision::ConversationProvisioner,
};
