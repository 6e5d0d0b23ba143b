//! HTTP/WebSocket API layer.
//!
//! This module contains thin handlers that delegate to the [`Jukebox`].
//! It provides the router construction and server startup functionality.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::events::BroadcastEventBridge;
use crate::services::Jukebox;

pub mod http;
pub mod response;
pub mod ws;

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the listen address.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Shared application state for the API layer.
///
/// This is a thin wrapper that holds references to services.
/// All business logic lives in the services themselves.
#[derive(Clone)]
pub struct AppState {
    /// Command surface for every room.
    pub jukebox: Arc<Jukebox>,
    /// Source of room events for WebSocket subscribers.
    pub event_bridge: Arc<BroadcastEventBridge>,
}

impl AppState {
    pub fn new(jukebox: Arc<Jukebox>, event_bridge: Arc<BroadcastEventBridge>) -> Self {
        Self {
            jukebox,
            event_bridge,
        }
    }
}

/// Serves the API on `addr` until `shutdown` is cancelled.
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;

    log::info!("[Server] Listening on http://{}", local);
    let app = http::create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    log::info!("[Server] Stopped");
    Ok(())
}
