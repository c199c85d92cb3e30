use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bookshelf::{http, Config, FileStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .init();

    info!(db = ?config.db_path, "opening book store");
    let store = FileStore::open(&config.db_path)
        .with_context(|| format!("Failed to open book store at {:?}", config.db_path))?;

    http::serve(Arc::new(store), &config)
        .await
        .with_context(|| format!("Server error on {}", config.bind_addr()))?;

    Ok(())
}
