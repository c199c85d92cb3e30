//! Book resource handlers.
//!
//! Each handler is a thin translation between an HTTP request and one store
//! call. A 404 returns the error body only.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::info;

use super::AppState;
use crate::book::{self, Book};
use crate::error::ApiError;
use crate::id;
use crate::store::BookStore;

/// `GET /books`
pub(super) async fn list_books<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.store.get_all()?))
}

/// `GET /books/:id`
pub(super) async fn get_book<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state.store.find_by_id(&id)?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(book))
}

/// `POST /books`
pub(super) async fn create_book<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let payload = book::validate_new(json_body(body)?)?;
    let book = state.store.insert(Book::new(id::generate(), payload))?;
    info!(id = book.id(), "created book");
    Ok(Json(book))
}

/// `PUT /books/:id`
pub(super) async fn update_book<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let patch = book::validate_patch(json_body(body)?)?;
    let book = state
        .store
        .update(&id, patch)?
        .ok_or(ApiError::NotFound(id))?;
    info!(id = book.id(), "updated book");
    Ok(Json(book))
}

/// `DELETE /books/:id`
pub(super) async fn delete_book<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.store.remove(&id)? {
        return Err(ApiError::NotFound(id));
    }
    info!(id = %id, "deleted book");
    Ok(StatusCode::OK)
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::DecodeFailed(rejection.body_text()))
}
