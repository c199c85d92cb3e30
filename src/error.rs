//! Error types for the store and the HTTP layer.
//!
//! `StoreError` describes what went wrong with the backing document.
//! `ApiError` is what a request handler returns; each variant maps to a
//! single HTTP status via [`ApiError::status_code`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or persisting the book collection.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the backing document.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing document is not valid JSON or has the wrong shape.
    #[error("invalid document in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the backing document.
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission denied on the document or its directory.
    #[error("permission denied: cannot access '{path}'")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk full or quota exceeded.
    #[error("disk full or quota exceeded while writing '{path}'")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temp file was written but could not be moved into place.
    #[error("atomic write failed: could not rename '{from}' to '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The in-memory collection could not be serialized.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// A record with this id is already stored.
    #[error("duplicate book id: {0}")]
    DuplicateId(String),
}

impl StoreError {
    /// Classify an I/O error raised while writing `path`.
    pub fn from_write(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path, source },
            io::ErrorKind::StorageFull => StoreError::DiskFull { path, source },
            _ => StoreError::Write { path, source },
        }
    }

    /// Classify an I/O error raised while reading `path`.
    pub fn from_read(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path, source },
            _ => StoreError::Read { path, source },
        }
    }
}

/// Error type for book request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No book with this id.
    #[error("book not found: {0}")]
    NotFound(String),

    /// Request body is not decodable JSON.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Request body decoded but does not describe a book.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Store rejected the write (id collision, persistence failure).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::DecodeFailed(_) => 400,
            ApiError::Validation(_) => 400,
            ApiError::Store(StoreError::DuplicateId(_)) => 409,
            ApiError::Store(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DecodeFailed(err.to_string())
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
