//! Book storage.
//!
//! `BookStore` is the CRUD contract the HTTP layer talks to. Two
//! implementations ship with the crate:
//!
//! - [`FileStore`] keeps the collection in memory and flushes the whole
//!   document to a JSON file after every mutation.
//! - [`InMemoryStore`] never touches disk. Useful for tests and throwaway runs.
//!
//! ## Document layout
//!
//! ```json
//! { "books": [ { "id": "d5fE_asz", "title": "...", "author": "..." } ] }
//! ```
//!
//! Unknown top-level keys are carried through untouched.
//!
//! ## Example
//!
//! ```ignore
//! use bookshelf::{Book, BookStore, FileStore};
//!
//! let store = FileStore::open("db.json")?;
//! let book = store.insert(Book::new(bookshelf::id::generate(), payload))?;
//! assert_eq!(store.find_by_id(book.id())?, Some(book));
//! ```

mod file;
mod in_memory;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::book::Book;
use crate::error::StoreError;

pub use file::FileStore;
pub use in_memory::InMemoryStore;

/// CRUD storage for the book collection.
///
/// Reads may run concurrently with each other. Mutations are serialized and
/// must be durable before they return `Ok`.
pub trait BookStore: Send + Sync {
    /// Materialize the collection, creating an empty one if none exists.
    ///
    /// Idempotent: once loaded, returns the in-memory collection.
    fn load(&self) -> Result<Vec<Book>, StoreError>;

    /// All books, in insertion order.
    fn get_all(&self) -> Result<Vec<Book>, StoreError>;

    /// First book whose id equals `id`.
    fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError>;

    /// Append a book and persist. Fails with `DuplicateId` if the id is taken.
    fn insert(&self, book: Book) -> Result<Book, StoreError>;

    /// Shallow-merge `patch` into the book with this id and persist.
    ///
    /// Returns `None` (and writes nothing) if no such book exists.
    fn update(&self, id: &str, patch: Map<String, Value>) -> Result<Option<Book>, StoreError>;

    /// Remove the book with this id and persist. Returns whether one was removed.
    fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

/// The persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    books: Vec<Book>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Document {
    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id() == id)
    }

    fn books(&self) -> &[Book] {
        &self.books
    }

    fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id() == id)
    }

    fn insert(&mut self, book: Book) -> Result<Book, StoreError> {
        if book.id().is_empty() || self.position(book.id()).is_some() {
            return Err(StoreError::DuplicateId(book.id().to_string()));
        }
        self.books.push(book.clone());
        Ok(book)
    }

    fn update(&mut self, id: &str, patch: Map<String, Value>) -> Option<Book> {
        let index = self.position(id)?;
        let book = &mut self.books[index];
        book.merge(patch);
        Some(book.clone())
    }

    fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.books.remove(index);
                true
            }
            None => false,
        }
    }
}
