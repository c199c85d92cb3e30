//! bookshelf - a small REST API for book records kept in a JSON file.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookshelf::{http, Config, FileStore};
//!
//! let config = Config::default();
//! let store = Arc::new(FileStore::open(&config.db_path)?);
//! http::serve(store, &config).await?;
//! ```
//!
//! The store can also be used on its own:
//!
//! ```ignore
//! use bookshelf::{book, id, Book, BookStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let payload = book::validate_new(serde_json::json!({ "title": "Dune", "author": "Herbert" }))?;
//! let created = store.insert(Book::new(id::generate(), payload))?;
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod id;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use book::Book;
pub use config::Config;
pub use error::{ApiError, StoreError};
pub use store::{BookStore, FileStore, InMemoryStore};
