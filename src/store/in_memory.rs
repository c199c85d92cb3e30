//! InMemoryStore - book store that never touches disk.

use std::sync::RwLock;

use serde_json::{Map, Value};

use super::{BookStore, Document};
use crate::book::Book;
use crate::error::StoreError;

/// In-memory book store for testing and development.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<Document>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `books`.
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Result<Self, StoreError> {
        let store = Self::new();
        for book in books {
            store.insert(book)?;
        }
        Ok(store)
    }
}

impl BookStore for InMemoryStore {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        self.get_all()
    }

    fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        let doc = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("get_all"))?;
        Ok(doc.books().to_vec())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError> {
        let doc = self
            .state
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_id"))?;
        Ok(doc.find(id).cloned())
    }

    fn insert(&self, book: Book) -> Result<Book, StoreError> {
        let mut doc = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;
        doc.insert(book)
    }

    fn update(&self, id: &str, patch: Map<String, Value>) -> Result<Option<Book>, StoreError> {
        let mut doc = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;
        Ok(doc.update(id, patch))
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut doc = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?;
        Ok(doc.remove(id))
    }
}
