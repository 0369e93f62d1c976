//! Shared state for the HTTP layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::DocumentStore;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
///
/// Handlers hold no state of their own beyond this: the document store
/// connection, the loaded configuration and the live count of real-time
/// connections.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<DocumentStore>,
    pub config: Arc<ServerConfig>,
    connections: Arc<AtomicUsize>,
}

impl ApiContext {
    pub fn new(store: DocumentStore, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of open real-time connections.
    pub fn live_connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Returns the count including the new connection.
    pub(crate) fn connection_opened(&self) -> usize {
        self.connections.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn connection_closed(&self) -> usize {
        self.connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .map_or(0, |prev| prev.saturating_sub(1))
    }
}
