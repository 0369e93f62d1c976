use super::http::HttpError;

/// Why a client operation failed.
///
/// The UI only ever sees `user_message`, so every variant collapses to a
/// single string; the variants exist for callers that want to branch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperationError {
    /// No bearer token in persisted storage. No request was sent.
    #[error("No token found")]
    Unauthenticated,
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Server rejected request with status {status}")]
    ServerRejected { status: u16, message: Option<String> },
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Invalid request body: {0}")]
    Encode(String),
}

impl OperationError {
    /// Message surfaced in a slice's `last_error`.
    ///
    /// The server's own message wins when it sent one; otherwise the
    /// operation-specific `fallback` is used.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Unauthenticated => self.to_string(),
            Self::ServerRejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<HttpError> for OperationError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Transport(detail) => Self::Transport(detail),
            HttpError::Rejected { status, message } => Self::ServerRejected { status, message },
            HttpError::Decode(detail) => Self::Decode(detail),
        }
    }
}
