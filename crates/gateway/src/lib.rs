//! Webhook gateway for the Bot Framework bridge.
//!
//! One axum route pair (`GET`/`POST /botframework`): the POST handler is the
//! inbound half of the bridge, the GET handler a platform liveness probe.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use {
    server::{build_app, start},
    state::AppState,
};
