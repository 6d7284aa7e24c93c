//! Tidepool: a same-host website mirror
//!
//! This crate downloads a website into a locally browsable directory tree:
//! starting from a seed URL it fetches each page, recursively descends into
//! every same-host resource the page references, and rewrites those
//! references to relative local paths so the mirror works straight off the
//! filesystem.

pub mod config;
pub mod crawler;
pub mod mapper;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mirror operations
///
/// Every variant is scoped to the one URL (or path) that produced it; the
/// crawler reports the error and abandons that branch of the descent rather
/// than aborting the run. Only a failure on the seed URL itself is fatal.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetch failed for {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Parse failed for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{mirror, Mirror};
pub use mapper::{is_markup_path, local_path_for};
pub use state::{MirrorStats, VisitedSet};
