//! Gazette scraper: daily digest of the Official Gazette
//!
//! This crate fetches the gazette homepage, extracts and classifies its
//! publication entries, stores one immutable JSON snapshot per day and serves
//! the most recent snapshot over HTTP.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod publish;
pub mod record;
pub mod server;
pub mod storage;
pub mod text;

use thiserror::Error;

/// Main error type for gazette scraper operations
#[derive(Debug, Error)]
pub enum GazetteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch source page {url}: {source}")]
    SourceFetch { url: String, source: FetchError },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),
}

/// Errors raised by a single outbound HTTP fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },
}

/// Result type alias for gazette scraper operations
pub type Result<T> = std::result::Result<T, GazetteError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{classify_subtype, classify_title, Category, Subtype};
pub use config::Config;
pub use publish::{PublishOutcome, Publisher};
pub use record::{Attachment, Record};
