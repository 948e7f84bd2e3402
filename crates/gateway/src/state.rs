use std::sync::Arc;

use {
    botbridge_channels::{ChannelRegistry, HostSink},
    botbridge_connector::Bridge,
};

/// Shared state handed to every webhook handler.
///
/// The registry and bridge are shared with the outbound path; the sink is
/// the host's half of the collaboration.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChannelRegistry>,
    pub bridge: Arc<Bridge>,
    pub sink: Arc<dyn HostSink>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<ChannelRegistry>, bridge: Arc<Bridge>, sink: Arc<dyn HostSink>) -> Self {
        Self {
            registry,
            bridge,
            sink,
        }
    }
}
