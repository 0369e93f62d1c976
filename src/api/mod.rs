//! HTTP API server.
//!
//! Exposes appointments and treatment plans as JSON resources under
//! `/api/`, a public health check, and a real-time channel that reports
//! connects and disconnects. Resource routes require a bearer token.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;
pub mod websocket;

pub use error::ApiError;
pub use router::build_router;
pub use server::{serve, start_server_on, ServerError, ServerHandle, ServerSession};
pub use types::ApiContext;
