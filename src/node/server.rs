//! HTTP Server & Lifecycle
//!
//! Builds the axum router for a node, serves it until a shutdown signal
//! arrives, and runs the periodic maintenance task.
//!
//! Shutdown stops accepting connections and lets in-flight handlers finish.
//! Lookups still waiting at that point are not cancelled; they end through
//! their own timeout or with the process.

use super::handlers::*;
use super::protocol::*;
use super::service::FloodNode;

use anyhow::Result;
use axum::{Extension, Router, routing::post};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(30);

pub fn router(node: Arc<FloodNode>) -> Router {
    Router::new()
        .route(ENDPOINT_REQUEST, post(handle_request))
        .route(ENDPOINT_RESPONSE, post(handle_response))
        .route(ENDPOINT_GET, post(handle_get))
        .route(ENDPOINT_PUT, post(handle_put))
        .route(ENDPOINT_DELETE, post(handle_delete))
        .layer(Extension(node))
}

/// Serves `node` on `listener` until `shutdown` resolves, then drains
/// in-flight requests.
pub async fn serve<F>(node: Arc<FloodNode>, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(
        "Node {:?} serving on {} with {} peers",
        node.id,
        listener.local_addr()?,
        node.routing_table().len()
    );

    axum::serve(listener, router(node))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Node stopped");
    Ok(())
}

/// Prunes the request ledger and logs node stats every `period`.
pub fn spawn_maintenance(node: Arc<FloodNode>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let pruned = node.prune_ledger();
            if pruned > 0 {
                tracing::debug!("Pruned {} expired request ids", pruned);
            }
            tracing::info!(
                "Node stats: {} local entries, {} seen requests, {} pending lookups",
                node.local_entry_count(),
                node.ledger_size(),
                node.pending_count()
            );
        }
    })
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down node...");
}
