//! Listener lifecycle.

use crate::app::build_router;
use crate::error::ServerError;
use crate::state::AppState;
use axum::Router;
use log::{info, warn};
use slay_rs_config::ServerConfig;
use std::future::Future;
use tokio::net::TcpListener;

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(server: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let address = server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(
        "slay backend listening (address={}, upstream_configured={})",
        listener.local_addr().map(|addr| addr.to_string()).unwrap_or(address),
        state.upstream_configured
    );
    let router = build_router(state, server);
    serve_with_shutdown(listener, router, shutdown_signal()).await
}

/// Serve `router` on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("slay backend stopped");
    Ok(())
}

/// Resolves on ctrl-c.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
