use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::OperationError;
use super::http::{HttpRequest, Transport};
use super::storage::{PersistentStorage, StorageError};
use crate::config::TOKEN_STORAGE_KEY;

/// Authenticated JSON access to the clinic API.
///
/// Every call reads the bearer token from persisted storage first; with no
/// token it fails with `OperationError::Unauthenticated` and the transport
/// is never touched.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    storage: Arc<dyn PersistentStorage>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn PersistentStorage>) -> Self {
        Self { transport, storage }
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get_item(TOKEN_STORAGE_KEY)
            .filter(|t| !t.is_empty())
    }

    /// Persist the bearer token used by subsequent requests.
    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_STORAGE_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_STORAGE_KEY)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, OperationError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: String, body: &B) -> Result<T, OperationError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: String, body: &B) -> Result<T, OperationError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<T, OperationError> {
        let bearer_token = self.token().ok_or(OperationError::Unauthenticated)?;

        let value = self
            .transport
            .send(HttpRequest {
                method,
                path,
                body,
                bearer_token,
            })
            .await?;

        serde_json::from_value(value).map_err(|e| OperationError::Decode(e.to_string()))
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, OperationError> {
    serde_json::to_value(body).map_err(|e| OperationError::Encode(e.to_string()))
}
