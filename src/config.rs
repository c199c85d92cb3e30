//! Server configuration
//!
//! Every setting can be given as a command-line flag or through the
//! environment. Flags take precedence over environment variables, which take
//! precedence over the defaults below.
//!
//! | Flag          | Env              | Default   |
//! |---------------|------------------|-----------|
//! | `--port`      | `PORT`           | `4000`    |
//! | `--host`      | `BOOKSHELF_HOST` | `0.0.0.0` |
//! | `--db`        | `BOOKSHELF_DB`   | `db.json` |
//! | `--log-level` | `BOOKSHELF_LOG`  | `info`    |

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DB_PATH: &str = "db.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the book API server.
#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf", version, about = "REST API for a JSON-file book collection")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Interface to bind
    #[arg(long, env = "BOOKSHELF_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Path of the JSON document holding the collection
    #[arg(long = "db", env = "BOOKSHELF_DB", default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "BOOKSHELF_LOG", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Address to bind, e.g. `0.0.0.0:4000`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised in the API documentation.
    pub fn public_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Log filter: `RUST_LOG` if set, otherwise the configured level.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}
