//! FileStore - JSON document on disk with an in-memory copy.
//!
//! Every mutation is applied to a copy of the document, written out with an
//! atomic write (temp file, fsync, rename), and only then swapped into memory.
//! A failed write therefore leaves both the file and the in-memory collection
//! at their previous state.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{BookStore, Document};
use crate::book::Book;
use crate::error::StoreError;

/// Book store persisted to a single JSON file.
pub struct FileStore {
    path: PathBuf,
    state: RwLock<Option<Document>>,
}

impl FileStore {
    /// Create a store for `path` without touching disk.
    ///
    /// The document is loaded on first use, or explicitly via [`BookStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(None),
        }
    }

    /// Create a store and load (or initialize) its document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document from disk, or write an empty one if there is none.
    fn read_or_init(&self) -> Result<Document, StoreError> {
        if self.path.exists() {
            let text =
                fs::read_to_string(&self.path).map_err(|e| StoreError::from_read(&self.path, e))?;
            if !text.trim().is_empty() {
                let doc: Document =
                    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                        path: self.path.clone(),
                        source,
                    })?;
                info!(path = ?self.path, books = doc.books().len(), "loaded book store");
                return Ok(doc);
            }
        }

        let doc = Document::default();
        self.persist(&doc)?;
        info!(path = ?self.path, "initialized empty book store");
        Ok(doc)
    }

    fn loaded<'a>(&self, slot: &'a mut Option<Document>) -> Result<&'a mut Document, StoreError> {
        let doc = match slot.take() {
            Some(doc) => doc,
            None => self.read_or_init()?,
        };
        Ok(slot.insert(doc))
    }

    fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;
        atomic_write(&self.path, &bytes)
    }

    fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Document) -> T,
    ) -> Result<T, StoreError> {
        {
            let guard = self
                .state
                .read()
                .map_err(|_| StoreError::LockPoisoned(operation))?;
            if let Some(doc) = guard.as_ref() {
                return Ok(f(doc));
            }
        }

        let mut guard = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        let doc = self.loaded(&mut guard)?;
        Ok(f(doc))
    }

    /// Run `f` against a copy of the document. If it reports a change, persist
    /// the copy and swap it in.
    fn mutate<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Document) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        let current = self.loaded(&mut guard)?;

        let mut next = current.clone();
        let (out, changed) = f(&mut next)?;
        if changed {
            self.persist(&next)?;
            *current = next;
        }
        Ok(out)
    }
}

impl BookStore for FileStore {
    fn load(&self) -> Result<Vec<Book>, StoreError> {
        self.read("load", |doc| doc.books().to_vec())
    }

    fn get_all(&self) -> Result<Vec<Book>, StoreError> {
        self.read("get_all", |doc| doc.books().to_vec())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Book>, StoreError> {
        self.read("find_by_id", |doc| doc.find(id).cloned())
    }

    fn insert(&self, book: Book) -> Result<Book, StoreError> {
        let book = self.mutate("insert", |doc| Ok((doc.insert(book)?, true)))?;
        debug!(id = book.id(), "inserted book");
        Ok(book)
    }

    fn update(&self, id: &str, patch: Map<String, Value>) -> Result<Option<Book>, StoreError> {
        let updated = self.mutate("update", |doc| {
            let updated = doc.update(id, patch);
            let changed = updated.is_some();
            Ok((updated, changed))
        })?;
        if updated.is_some() {
            debug!(id, "updated book");
        }
        Ok(updated)
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.mutate("remove", |doc| {
            let removed = doc.remove(id);
            Ok((removed, removed))
        })?;
        if removed {
            debug!(id, "removed book");
        }
        Ok(removed)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file next to the target
/// 2. Sync the file to disk
/// 3. Rename the temp file over the target
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::from_write(parent, e))?;
    }

    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|source| StoreError::Rename {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        discard_temp(&temp_path);
    }
    result
}

fn write_temp(temp_path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let mut file = File::create(temp_path).map_err(|e| StoreError::from_write(temp_path, e))?;
    file.write_all(data)
        .map_err(|e| StoreError::from_write(temp_path, e))?;
    file.sync_all()
        .map_err(|e| StoreError::from_write(temp_path, e))
}

/// Best-effort removal of a temp file left behind by a failed write.
fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = ?temp_path, error = %e, "failed to remove temp file");
        }
    }
}

/// `db.json` -> `db.json.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push(".tmp");
            path.with_file_name(name)
        }
        None => path.with_extension("tmp"),
    }
}
