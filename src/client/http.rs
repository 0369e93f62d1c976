//! HTTP client adapter.
//!
//! Sends exactly one request per call: no retries, no timeout beyond the
//! transport default. A 2xx response yields its decoded JSON body; anything
//! else is a single `HttpError` carrying the server's `message` if it gave one.

use futures_util::future::BoxFuture;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

/// One fully-specified request, bearer token included.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/api/appointments`.
    pub path: String,
    pub body: Option<Value>,
    pub bearer_token: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Server responded with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Sends a request and returns the decoded JSON body.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<Value, HttpError>>;
}

/// Error body shape shared by the API server.
#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
}

/// Pull the `message` field out of an error body, if the body is JSON and
/// carries a non-empty one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.message)
        .filter(|m| !m.trim().is_empty())
}

/// `Transport` backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: HttpRequest) -> Result<Value, HttpError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, path = %request.path, "Sending API request");

        let mut builder = self
            .client
            .request(request.method, &url)
            .bearer_auth(&request.bearer_token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Rejected {
                status: status.as_u16(),
                message: server_message(&body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<Value, HttpError>> {
        Box::pin(self.execute(request))
    }
}
