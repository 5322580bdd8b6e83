// Web server — Axum-based HTTP boundary for the moderation service.
//
// One JSON endpoint does the work (POST /content-moderation/moderate); a
// status route exposes the tracked request rate. Request validation happens
// at this boundary: a malformed body never reaches the service.

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::ModerationService;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ModerationService>,
}

/// Start the Axum web server and block until it exits.
///
/// Returns once the listener shuts down (ctrl-c); the caller runs the
/// cleanup hook afterwards.
pub async fn run_server(service: Arc<ModerationService>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(AppState { service });

    let addr = format!("{bind}:{port}");
    info!("palisade moderation service listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the application router. Public so integration tests can drive it
/// with `tower::ServiceExt::oneshot` without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/content-moderation/moderate",
            post(handlers::moderate::moderate_text),
        )
        .route(
            "/content-moderation/status",
            get(handlers::status::get_status),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
