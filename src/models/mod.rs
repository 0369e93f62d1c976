pub mod appointment;
pub mod enums;
pub mod treatment_plan;

pub use appointment::*;
pub use enums::*;
pub use treatment_plan::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A server-owned record that lives in one document collection and is
/// addressed by its `_id`.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name in the document store.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}
