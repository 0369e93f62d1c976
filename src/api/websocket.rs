//! Real-time channel.
//!
//! Clients open `GET /ws`. The channel carries no application messages:
//! the server logs each connect and disconnect with a per-connection id
//! and keeps a live connection count. A browser `Origin` header must
//! match the configured client URL.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::header::ORIGIN;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

/// WebSocket upgrade handler.
pub async fn ws_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(origin) = headers.get(ORIGIN).and_then(|v| v.to_str().ok()) {
        if !origin_allowed(origin, &ctx.config.client_url) {
            tracing::warn!(origin, "WebSocket upgrade from unexpected origin");
            return Err(ApiError::Forbidden);
        }
    }

    Ok(ws.on_upgrade(move |socket| handle_ws(socket, ctx)))
}

fn origin_allowed(origin: &str, client_url: &str) -> bool {
    origin.trim_end_matches('/') == client_url.trim_end_matches('/')
}

async fn handle_ws(socket: WebSocket, ctx: ApiContext) {
    let socket_id = Uuid::new_v4().to_string();
    let live = ctx.connection_opened();
    tracing::info!(socket_id = %socket_id, live, "Client connected");

    let (mut sink, mut stream) = socket.split();

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(Message::Ping(payload)) => {
                if sink.send(Message::Pong(payload)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
        }
    }

    let live = ctx.connection_closed();
    tracing::info!(socket_id = %socket_id, live, "Client disconnected");
}
