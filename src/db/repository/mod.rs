//! Repository layer: entity-scoped operations over the document store.
//!
//! Each function is one request's worth of work: validate, assign ids and
//! server-side defaults, persist, and return the canonical record.

mod appointments;
mod treatment_plans;

pub use appointments::*;
pub use treatment_plans::*;

use uuid::Uuid;

use super::DatabaseError;

/// Server-assigned document id.
pub(crate) fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub(crate) fn missing_field(field: &'static str) -> DatabaseError {
    DatabaseError::ConstraintViolation(format!("{field} is required"))
}

pub(crate) fn not_found(entity_type: &str, id: &str) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: entity_type.to_string(),
        id: id.to_string(),
    }
}
