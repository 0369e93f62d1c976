//! Client side of the clinic API: authenticated HTTP access and the
//! persisted key/value storage that holds the bearer token.
//!
//! `Transport` is the only seam that touches the network, so the store's
//! operations can be driven by a scripted transport in tests.

pub mod api;
pub mod error;
pub mod http;
pub mod storage;

#[cfg(test)]
pub(crate) mod mock;

pub use api::ApiClient;
pub use error::OperationError;
pub use http::{HttpError, HttpRequest, ReqwestTransport, Transport};
pub use storage::{FileStorage, MemoryStorage, PersistentStorage, StorageError};
