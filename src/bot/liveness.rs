//! Liveness endpoint.
//!
//! Hosting platforms that expect a web process want a port to be bound.
//! Every GET answers with a fixed plain-text body; nothing here touches bot state.

use std::net::SocketAddr;

use axum::Router;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Body returned to health checks.
pub const LIVENESS_BODY: &str = "Telegram Bot is running!";

/// Router answering every path.
pub fn router() -> Router {
    Router::new().fallback(liveness)
}

async fn liveness(method: Method) -> Response {
    if method != Method::GET {
        return StatusCode::NOT_IMPLEMENTED.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        LIVENESS_BODY,
    )
        .into_response()
}

/// Serve the liveness endpoint on `0.0.0.0:port` until the process exits.
///
/// Failures are logged; the bot keeps running without the endpoint.
pub async fn serve(port: u16) {
    let address = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match TcpListener::bind(address).await {
        Ok(l) => l,
        Err(e) => {
            error!(%address, error = %e, "Failed to bind liveness endpoint");
            return;
        }
    };

    info!("HTTP server running on port {}", port);

    if let Err(e) = axum::serve(listener, router()).await {
        error!(error = %e, "Liveness endpoint stopped");
    }
}
