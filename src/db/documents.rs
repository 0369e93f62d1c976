//! Document store: JSON documents grouped into named collections.
//!
//! Every document is keyed by its `_id` within its collection and keeps
//! insertion order, which is the order `list` returns. One connection is
//! shared behind a mutex; each call holds the lock for a single statement
//! or transaction, never across an `.await`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{open_database, open_memory_database, DatabaseError};
use crate::models::Entity;

pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Store a new document. Fails if the id is already taken.
    pub fn insert<E: Entity>(&self, entity: &E) -> Result<(), DatabaseError> {
        let body = encode(entity)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![E::COLLECTION, entity.id(), body],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DatabaseError::ConstraintViolation(format!(
                    "duplicate id {} in {}",
                    entity.id(),
                    E::COLLECTION
                ))
            }
            other => DatabaseError::Sqlite(other),
        })?;
        Ok(())
    }

    pub fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, DatabaseError> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![E::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|b| decode::<E>(id, &b)).transpose()
    }

    /// All documents of a collection in insertion order.
    pub fn list<E: Entity>(&self) -> Result<Vec<E>, DatabaseError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![E::COLLECTION], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row?;
            documents.push(decode::<E>(&id, &body)?);
        }
        Ok(documents)
    }

    /// Load a document, let `f` change it, and write it back in one
    /// transaction. Returns the stored result.
    pub fn modify<E, F>(&self, id: &str, f: F) -> Result<E, DatabaseError>
    where
        E: Entity,
        F: FnOnce(&mut E) -> Result<(), DatabaseError>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let body: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![E::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()?;
        let body = body.ok_or_else(|| DatabaseError::NotFound {
            entity_type: E::COLLECTION.to_string(),
            id: id.to_string(),
        })?;

        let mut entity = decode::<E>(id, &body)?;
        f(&mut entity)?;
        if entity.id() != id {
            return Err(DatabaseError::ConstraintViolation(
                "document id is immutable".into(),
            ));
        }

        tx.execute(
            "UPDATE documents SET body = ?3, updated_at = datetime('now')
             WHERE collection = ?1 AND id = ?2",
            params![E::COLLECTION, id, encode(&entity)?],
        )?;
        tx.commit()?;
        Ok(entity)
    }
}

fn encode<E: Entity>(entity: &E) -> Result<String, DatabaseError> {
    serde_json::to_string(entity).map_err(|e| DatabaseError::CorruptDocument {
        collection: E::COLLECTION,
        id: entity.id().to_string(),
        reason: e.to_string(),
    })
}

fn decode<E: Entity>(id: &str, body: &str) -> Result<E, DatabaseError> {
    serde_json::from_str(body).map_err(|e| DatabaseError::CorruptDocument {
        collection: E::COLLECTION,
        id: id.to_string(),
        reason: e.to_string(),
    })
}
