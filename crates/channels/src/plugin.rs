use async_trait::async_trait;

use crate::message::Message;

/// Host collaborator interface.
///
/// The bridge normalizes inbound activities into [`Message`]s and hands them
/// to the host through this sink; the host owns routing, persistence, and
/// command dispatch. Lifecycle hooks default to no-ops.
#[async_trait]
pub trait HostSink: Send + Sync {
    /// A normalized inbound message is ready for the host.
    async fn on_message(&self, message: Message);

    /// The bridge came online and is accepting webhooks.
    async fn on_connect(&self) {}

    /// The bridge is shutting down.
    async fn on_disconnect(&self) {}
}
