//! HTTP transport - maps REST requests onto a [`BookStore`].
//!
//! Requires the `http` feature (on by default). Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /books` - every book.
//! - `GET /books/:id` - one book, or 404.
//! - `POST /books` - create. Body = `{ "title", "author", ... }`.
//! - `PUT /books/:id` - shallow-merge the body into an existing book.
//! - `DELETE /books/:id` - remove, or 404.
//! - `GET /health` - `{ "ok": true, "books": <count> }`.
//! - `GET /api-docs` - Swagger UI; `GET /api-docs/openapi.json` - the raw document.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookshelf::{http, Config, FileStore};
//!
//! let config = Config::default();
//! let store = Arc::new(FileStore::open(&config.db_path)?);
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(store.clone(), &config.public_url());
//!
//! // Or serve directly
//! http::serve(store, &config).await?;
//! ```

mod books;
mod docs;
mod middleware;

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::store::BookStore;

pub use docs::{openapi, RouteDoc, Shape, ROUTES};

/// Shared handler state.
pub struct AppState<S> {
    store: Arc<S>,
    docs: Arc<Value>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            docs: self.docs.clone(),
        }
    }
}

/// Build an axum `Router` serving the book API from `store`.
///
/// `public_url` is advertised as the server in the API documentation.
pub fn router<S: BookStore + 'static>(store: Arc<S>, public_url: &str) -> Router {
    let state = AppState {
        store,
        docs: Arc::new(openapi(public_url)),
    };

    Router::new()
        .route(
            "/books",
            get(books::list_books::<S>).post(books::create_book::<S>),
        )
        .route(
            "/books/:id",
            get(books::get_book::<S>)
                .put(books::update_book::<S>)
                .delete(books::delete_book::<S>),
        )
        .route("/health", get(health_handler::<S>))
        .route("/api-docs", get(docs::swagger_ui))
        .route("/api-docs/openapi.json", get(docs::openapi_handler::<S>))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Serve the book API at `config.bind_addr()` until Ctrl-C / SIGTERM.
pub async fn serve<S: BookStore + 'static>(
    store: Arc<S>,
    config: &Config,
) -> Result<(), std::io::Error> {
    let app = router(store, &config.public_url());
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "book API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// `GET /health` - returns `{ "ok": true, "books": <count> }`.
async fn health_handler<S: BookStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.store.get_all()?.len();
    Ok(Json(json!({ "ok": true, "books": count })))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
