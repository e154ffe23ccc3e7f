//! HTTP server lifecycle.
//!
//! Binds the configured address, mounts `api_router`, and serves in the
//! foreground until a shutdown signal arrives.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Bind `addr` and serve the API until ctrl-c.
pub async fn serve(addr: SocketAddr, ctx: ApiContext) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, ctx).await
}

/// Serve the API on an already-bound listener.
///
/// Factored out so tests can bind an ephemeral port first.
pub async fn serve_on(listener: TcpListener, ctx: ApiContext) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "HealthSync API listening");

    axum::serve(listener, api_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
