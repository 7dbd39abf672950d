//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file and applying environment overrides on top of it.
//!
//! # Example
//!
//! ```no_run
//! use gazette_scraper::config::load_runtime_config;
//! use std::path::Path;
//!
//! let config = load_runtime_config(Some(Path::new("gazette.toml"))).unwrap();
//! println!("Detail pages time out after {}s", config.http.detail_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DetailRetryPolicy, ExtractConfig, HttpConfig, SourceConfig, SourceFailurePolicy,
    StorageConfig, DEFAULT_SOURCE_URL, DEFAULT_USER_AGENT, MIN_TITLE_CHARS,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, load_config, load_runtime_config, parse_config,
    ENV_NO_PROXY, ENV_PROXY_URL, ENV_STORAGE_CONNECTION_STRING,
};
pub use validation::validate;
