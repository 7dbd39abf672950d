use crate::config::types::{
    Config, ExtractConfig, HttpConfig, SourceConfig, StorageConfig, MIN_TITLE_CHARS,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_http_config(&config.http)?;
    validate_extract_config(&config.extract)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates source page configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid source url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Source url '{}' must use http or https",
            config.url
        )));
    }

    if !(-12..=14).contains(&config.utc_offset_hours) {
        return Err(ConfigError::Validation(format!(
            "utc_offset_hours must be between -12 and 14, got {}",
            config.utc_offset_hours
        )));
    }

    Ok(())
}

/// Validates outbound HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.source_timeout_secs < 1 || config.detail_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got source={}s detail={}s",
            config.source_timeout_secs, config.detail_timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.detail_concurrency < 1 || config.detail_concurrency > 16 {
        return Err(ConfigError::Validation(format!(
            "detail_concurrency must be between 1 and 16, got {}",
            config.detail_concurrency
        )));
    }

    if let Some(proxy) = &config.proxy_url {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy url '{}': {}", proxy, e)))?;
    }

    Ok(())
}

/// Validates extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if config.min_title_chars < MIN_TITLE_CHARS {
        return Err(ConfigError::Validation(format!(
            "min_title_chars must be >= {}, got {}",
            MIN_TITLE_CHARS, config.min_title_chars
        )));
    }

    if config.full_text_max_chars < 1 {
        return Err(ConfigError::Validation(
            "full_text_max_chars must be >= 1".to_string(),
        ));
    }

    if config.date_header_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "date_header_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    for (name, value) in [("key_prefix", &config.key_prefix), ("key_suffix", &config.key_suffix)] {
        if value.contains('/') || value.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "{} must not contain path separators, got '{}'",
                name, value
            )));
        }
    }

    if let Some(conn) = &config.connection_string {
        if conn.trim().is_empty() {
            return Err(ConfigError::Validation(
                "connection_string cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
