use std::net::SocketAddr;

use {
    axum::{Router, routing::get},
    tracing::info,
};

use crate::{handlers, state::AppState};

/// Build the webhook router (shared between production startup and tests).
#[must_use]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/botframework",
            get(handlers::probe).post(handlers::inbound),
        )
        .with_state(state)
}

/// Start the webhook server and run until ctrl-c.
///
/// The host's connect/disconnect callbacks bracket the serve loop.
pub async fn start(bind: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let sink = std::sync::Arc::clone(&state.sink);
    let app = build_app(state);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "webhook server listening");

    sink.on_connect().await;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    sink.on_disconnect().await;
    info!("webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
