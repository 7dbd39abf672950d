use serde::Deserialize;

/// Default source page
pub const DEFAULT_SOURCE_URL: &str = "https://www.resmigazete.gov.tr/";

/// Shortest entry title ever kept; shorter strings are layout noise
pub const MIN_TITLE_CHARS: usize = 5;

/// Browser identification sent with every outbound request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Main configuration structure
///
/// Every section has defaults, so an empty TOML document is a valid
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub http: HttpConfig,
    pub extract: ExtractConfig,
    pub storage: StorageConfig,
}

/// What happens when the source page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFailurePolicy {
    /// Abort the run without writing a snapshot
    Fail,
    /// Publish an empty snapshot for the day (e.g. public holidays)
    Empty,
}

/// Retry behavior for detail page fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailRetryPolicy {
    /// Same exponential backoff as the source page
    Backoff,
    /// A single attempt, failures go straight into the record
    FailFast,
}

/// Source page configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Gazette homepage, also the base URL for relative links
    pub url: String,

    /// Offset of the gazette's local time from UTC, used to date snapshots
    #[serde(rename = "utc-offset-hours")]
    pub utc_offset_hours: i32,

    #[serde(rename = "on-source-failure")]
    pub on_source_failure: SourceFailurePolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            utc_offset_hours: 3,
            on_source_failure: SourceFailurePolicy::Fail,
        }
    }
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for the source page request (seconds)
    #[serde(rename = "source-timeout-secs")]
    pub source_timeout_secs: u64,

    /// Timeout for each detail page request (seconds)
    #[serde(rename = "detail-timeout-secs")]
    pub detail_timeout_secs: u64,

    /// Retries after the first attempt on retryable failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// First backoff delay (milliseconds), doubled on every retry
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,

    #[serde(rename = "detail-retry")]
    pub detail_retry: DetailRetryPolicy,

    /// Number of detail pages fetched at once
    #[serde(rename = "detail-concurrency")]
    pub detail_concurrency: usize,

    /// Outbound proxy, overridden by `PROXY_URL`
    #[serde(rename = "proxy-url")]
    pub proxy_url: Option<String>,

    /// Comma separated hosts that bypass the proxy, overridden by `NO_PROXY`
    #[serde(rename = "no-proxy")]
    pub no_proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            source_timeout_secs: 60,
            detail_timeout_secs: 45,
            max_retries: 3,
            backoff_base_ms: 1000,
            detail_retry: DetailRetryPolicy::Backoff,
            detail_concurrency: 1,
            proxy_url: None,
            no_proxy: None,
        }
    }
}

/// Entry extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Entries with shorter titles are treated as noise
    #[serde(rename = "min-title-chars")]
    pub min_title_chars: usize,

    /// Maximum length of a detail page's text
    #[serde(rename = "full-text-max-chars")]
    pub full_text_max_chars: usize,

    /// Phrase labelling date headers on the source page
    #[serde(rename = "date-header-marker")]
    pub date_header_marker: String,

    /// Titles dropped in addition to the built-in navigation blacklist
    #[serde(rename = "extra-blacklist")]
    pub extra_blacklist: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_title_chars: MIN_TITLE_CHARS,
            full_text_max_chars: 5000,
            date_header_marker: "tarihli ve".to_string(),
            extra_blacklist: Vec::new(),
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend location, overridden by `STORAGE_CONNECTION_STRING`
    #[serde(rename = "connection-string")]
    pub connection_string: Option<String>,

    #[serde(rename = "key-prefix")]
    pub key_prefix: String,

    #[serde(rename = "key-suffix")]
    pub key_suffix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            key_prefix: "resmi_gazete_".to_string(),
            key_suffix: ".json".to_string(),
        }
    }
}
