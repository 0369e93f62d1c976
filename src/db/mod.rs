pub mod documents;
pub mod repository;
pub mod sqlite;

pub use documents::DocumentStore;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Database file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Corrupt document {id} in {collection}: {reason}")]
    CorruptDocument {
        collection: &'static str,
        id: String,
        reason: String,
    },

    #[error("Database lock poisoned")]
    LockPoisoned,
}
