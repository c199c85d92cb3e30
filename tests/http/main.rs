//! HTTP integration tests.
//!
//! Starts the axum router on an ephemeral port and exercises it with reqwest.

#![cfg(feature = "http")]

mod books;
mod docs;
