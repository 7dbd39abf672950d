use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable holding the storage connection string
pub const ENV_STORAGE_CONNECTION_STRING: &str = "STORAGE_CONNECTION_STRING";

/// Environment variable holding the outbound proxy URL
pub const ENV_PROXY_URL: &str = "PROXY_URL";

/// Environment variable holding hosts that bypass the proxy
pub const ENV_NO_PROXY: &str = "NO_PROXY";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use gazette_scraper::config::load_config;
///
/// let config = load_config(Path::new("gazette.toml")).unwrap();
/// println!("Source: {}", config.source.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the process configuration: file (if any), then environment
///
/// The environment is read exactly once here; the resulting value is passed
/// to every component that needs it.
pub fn load_runtime_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides using the given lookup function
///
/// Empty or whitespace-only values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(conn) = get(ENV_STORAGE_CONNECTION_STRING) {
        config.storage.connection_string = Some(conn);
    }
    if let Some(proxy) = get(ENV_PROXY_URL) {
        config.http.proxy_url = Some(proxy);
    }
    if let Some(no_proxy) = get(ENV_NO_PROXY) {
        config.http.no_proxy = Some(no_proxy);
    }
}

impl Config {
    /// Returns the storage connection string or fails with the variable to set
    pub fn connection_string(&self) -> Result<&str, ConfigError> {
        self.storage
            .connection_string
            .as_deref()
            .ok_or(ConfigError::MissingEnv(ENV_STORAGE_CONNECTION_STRING))
    }
}
