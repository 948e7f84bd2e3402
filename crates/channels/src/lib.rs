//! Channel-scoped conversation state for the Bot Framework bridge.
//!
//! Identities and conversation references are parsed once per inbound
//! activity and never mutated; the [`ChannelRegistry`] is the single source
//! of truth for "where do we send things for channel X, user Y".

pub mod conversation;
pub mod error;
pub mod identity;
pub mod message;
pub mod plugin;
pub mod registry;

pub use {
    conversation::ConversationRef,
    error::{Error, Result},
    identity::{Identity, NOT_FOUND},
    message::Message,
    plugin::HostSink,
    registry::{Channel, ChannelRegistry},
};
