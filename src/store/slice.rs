//! Server-synchronized state for one entity type.
//!
//! Every asynchronous operation drives the slice through
//! `begin` → (`receive_*` | `fail`). The reducers here are synchronous and
//! total; the store applies them at the operation's start and settlement.

use crate::models::Entity;

/// How an update-style settlement treats `selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Replace `selected` with the response record.
    Replace,
    /// Replace `selected` only if it currently holds the same id.
    IfSelected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySlice<E> {
    /// Server order, ids unique.
    pub collection: Vec<E>,
    pub selected: Option<E>,
    pub pending: bool,
    pub last_error: Option<String>,
}

impl<E> Default for EntitySlice<E> {
    fn default() -> Self {
        Self {
            collection: Vec::new(),
            selected: None,
            pending: false,
            last_error: None,
        }
    }
}

impl<E: Entity> EntitySlice<E> {
    /// Operation started.
    pub fn begin(&mut self) {
        self.pending = true;
        self.last_error = None;
    }

    /// Operation failed with an already-normalized message.
    pub fn fail(&mut self, message: String) {
        self.pending = false;
        self.last_error = Some(message);
    }

    /// Operation dropped before it settled: nothing is applied except
    /// leaving the pending state.
    pub fn abandon(&mut self) {
        self.pending = false;
    }

    /// fetch-all settled: the response list replaces the collection.
    pub fn receive_all(&mut self, records: Vec<E>) {
        self.pending = false;
        self.collection = records;
    }

    /// fetch-by-id settled.
    pub fn receive_one(&mut self, record: E) {
        self.pending = false;
        self.selected = Some(record);
    }

    /// create settled: appended and selected.
    pub fn receive_created(&mut self, record: E) {
        self.pending = false;
        self.collection.push(record.clone());
        self.selected = Some(record);
    }

    /// update or status transition settled.
    ///
    /// The entry with the same id is replaced in place; a record not in
    /// the collection is not added.
    pub fn receive_updated(&mut self, record: E, selection: Selection) {
        self.pending = false;
        if let Some(slot) = self.collection.iter_mut().find(|e| e.id() == record.id()) {
            *slot = record.clone();
        }
        let replace = match selection {
            Selection::Replace => true,
            Selection::IfSelected => self
                .selected
                .as_ref()
                .is_some_and(|s| s.id() == record.id()),
        };
        if replace {
            self.selected = Some(record);
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected = None;
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn find(&self, id: &str) -> Option<&E> {
        self.collection.iter().find(|e| e.id() == id)
    }
}
