//! Server lifecycle: bind, spawn, shut down.
//!
//! `start_server_on` binds a listener, spawns `axum::serve` in a background
//! task and returns a handle carrying the bound address and a shutdown
//! channel. `serve` is the process entry: it opens the document store,
//! starts the server on the configured port and waits for Ctrl+C or
//! SIGTERM.

use std::net::{Ipv4Addr, SocketAddr};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::build_router;
use crate::api::types::ApiContext;
use crate::config::ServerConfig;
use crate::db::{DatabaseError, DocumentStore};

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to open database: {0}")]
    Database(#[from] DatabaseError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata for a running server.
#[derive(Debug, Clone)]
pub struct ServerSession {
    pub session_id: String,
    pub server_addr: SocketAddr,
    pub started_at: String,
}

/// Handle to a running server.
pub struct ServerHandle {
    pub session: ServerSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.session.server_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.session.server_addr)
    }

    /// Signal a graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish draining connections.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start serving `ctx` on `addr`. Port 0 picks an ephemeral port.
pub async fn start_server_on(ctx: ApiContext, addr: SocketAddr) -> Result<ServerHandle, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let addr = listener.local_addr()?;

    let app = build_router(ctx);

    let session = ServerSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr,
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ServerHandle {
        session,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Run the server until the process is asked to stop.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let store = DocumentStore::open(&config.database_path)?;
    tracing::info!(path = %config.database_path.display(), "Document store opened");

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let ctx = ApiContext::new(store, config);
    let mut server = start_server_on(ctx, addr).await?;

    shutdown_signal().await;
    server.shutdown();
    server.stopped().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
