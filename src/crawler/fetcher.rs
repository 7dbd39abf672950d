//! HTTP fetcher implementation
//!
//! This module handles all outbound HTTP requests, including:
//! - Building the HTTP client with the browser user agent and explicit proxy
//! - GET requests for the source page and detail pages
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::{DetailRetryPolicy, HttpConfig};
use crate::FetchError;
use reqwest::{Client, NoProxy, Proxy};
use std::time::Duration;

/// Status codes that are retried with backoff
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// Builds an HTTP client with proper configuration
///
/// The proxy comes only from `config`; ambient proxy variables are ignored so
/// the process-wide setting is read once, at startup.
///
/// # Arguments
///
/// * `config` - The outbound HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. malformed proxy URL)
///
/// # Example
///
/// ```no_run
/// use gazette_scraper::config::HttpConfig;
/// use gazette_scraper::crawler::build_http_client;
///
/// let config = HttpConfig {
///     proxy_url: Some("http://proxy.internal:3128".to_string()),
///     no_proxy: Some("localhost,127.0.0.1".to_string()),
///     ..HttpConfig::default()
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .no_proxy();

    if let Some(proxy_url) = &config.proxy_url {
        let bypass = config.no_proxy.as_deref().and_then(NoProxy::from_string);
        builder = builder.proxy(Proxy::all(proxy_url.as_str())?.no_proxy(bypass));
    }

    builder.build()
}

/// Returns true if a failed request is worth another attempt
///
/// | Condition | Retried |
/// |-----------|---------|
/// | HTTP 429, 500, 502, 503, 504 | yes |
/// | Other non-2xx status | no |
/// | Timeout | yes |
/// | Connection failure | yes |
/// | Anything else (body decode, builder) | no |
pub fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
        FetchError::Timeout { .. } => true,
        FetchError::Http { source, .. } => source.is_connect(),
    }
}

/// Delay before retry number `attempt` (zero-based)
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// GET-only fetcher for the source page and its detail pages
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    source_timeout: Duration,
    detail_timeout: Duration,
    source_retries: u32,
    detail_retries: u32,
    backoff_base: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the outbound HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        let detail_retries = match config.detail_retry {
            DetailRetryPolicy::Backoff => config.max_retries,
            DetailRetryPolicy::FailFast => 0,
        };

        Ok(Self {
            client,
            source_timeout: Duration::from_secs(config.source_timeout_secs),
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
            source_retries: config.max_retries,
            detail_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }

    /// Fetches the gazette homepage
    pub async fn fetch_source(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_retry(url, self.source_timeout, self.source_retries)
            .await
    }

    /// Fetches one detail page
    pub async fn fetch_detail(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_retry(url, self.detail_timeout, self.detail_retries)
            .await
    }

    async fn fetch_with_retry(
        &self,
        url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<String, FetchError> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url, timeout).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < max_retries && is_retryable(&e) => {
                    let delay = backoff_delay(self.backoff_base, attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:.1}s",
                        e,
                        attempt + 1,
                        max_retries + 1,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
