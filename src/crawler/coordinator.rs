//! Extraction coordinator - one pass over the gazette homepage
//!
//! This module ties the fetcher and the parser together:
//! - Fetching the source page (fatal on failure, subject to policy)
//! - Turning candidates into classified entries
//! - Dereferencing amendment detail pages into record text
//! - Preserving document order in the resulting records

use crate::config::{Config, ExtractConfig, SourceFailurePolicy};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{parse_entries, Entry, EntryFilter};
use crate::record::{Attachment, Record};
use crate::text::{truncate_chars, visible_text};
use crate::GazetteError;
use futures::stream::{self, StreamExt};
use scraper::Html;
use url::Url;

/// Turns homepage markup into snapshot records
#[derive(Debug, Clone)]
pub struct Extractor {
    fetcher: Fetcher,
    filter: EntryFilter,
    full_text_max_chars: usize,
    detail_concurrency: usize,
}

impl Extractor {
    /// Creates an extractor using the given fetcher for detail pages
    pub fn new(fetcher: Fetcher, config: &ExtractConfig, detail_concurrency: usize) -> Self {
        Self {
            fetcher,
            filter: EntryFilter::from_config(config),
            full_text_max_chars: config.full_text_max_chars,
            detail_concurrency: detail_concurrency.max(1),
        }
    }

    /// Produces the records for one page of markup
    ///
    /// Entries are filtered and classified without network access; only
    /// amendment regulations trigger a detail page fetch. A failed detail
    /// fetch never drops the record, it carries an error marker instead.
    ///
    /// # Arguments
    ///
    /// * `html` - Raw markup of the source page
    /// * `base_url` - The source page URL
    /// * `date` - Snapshot date, `DD.MM.YYYY`
    ///
    /// # Returns
    ///
    /// Records in source document order
    pub async fn extract(&self, html: &str, base_url: &Url, date: &str) -> Vec<Record> {
        let entries = parse_entries(html, base_url, &self.filter);
        let amendments = entries.iter().filter(|e| e.is_amendment()).count();
        tracing::info!(
            "Found {} entries ({} amendments to dereference)",
            entries.len(),
            amendments
        );

        stream::iter(entries.into_iter().map(|entry| self.attach(entry, date)))
            .buffered(self.detail_concurrency)
            .collect::<Vec<_>>()
            .await
    }

    async fn attach(&self, entry: Entry, date: &str) -> Record {
        let attachment = if entry.is_amendment() {
            Attachment::FullText(self.fetch_full_text(&entry.link).await)
        } else {
            Attachment::Link(entry.link)
        };

        Record {
            date: date.to_string(),
            category: entry.category,
            subtype: entry.subtype,
            title: entry.title,
            attachment,
        }
    }

    /// Returns the truncated text of a detail page or an error marker
    async fn fetch_full_text(&self, link: &str) -> String {
        let text = match self.fetcher.fetch_detail(link).await {
            Ok(body) => page_text(&body),
            Err(e) => {
                tracing::warn!("Detail page unavailable: {}", e);
                error_marker(&e)
            }
        };

        truncate_chars(&text, self.full_text_max_chars).to_string()
    }
}

/// Normalized visible text of a whole page
pub fn page_text(html: &str) -> String {
    visible_text(Html::parse_document(html).root_element())
}

/// Text stored in place of a detail page that could not be fetched
pub fn error_marker(error: &dyn std::error::Error) -> String {
    format!("[HATA: {}]", error)
}

/// Runs one extraction pass against the configured source page
pub struct Coordinator {
    source_url: Url,
    on_source_failure: SourceFailurePolicy,
    fetcher: Fetcher,
    extractor: Extractor,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated runtime configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(GazetteError)` - Invalid source URL or HTTP client setup failure
    pub fn new(config: &Config) -> Result<Self, GazetteError> {
        let source_url = Url::parse(&config.source.url)?;
        let fetcher = Fetcher::new(&config.http)?;
        let extractor = Extractor::new(
            fetcher.clone(),
            &config.extract,
            config.http.detail_concurrency,
        );

        Ok(Self {
            source_url,
            on_source_failure: config.source.on_source_failure,
            fetcher,
            extractor,
        })
    }

    /// Fetches the source page and extracts the day's records
    ///
    /// # Returns
    ///
    /// * `Ok(records)` - The page was fetched; records may be empty
    /// * `Ok(vec![])` - The page was unavailable and the policy is `empty`
    /// * `Err(GazetteError::SourceFetch)` - The page was unavailable and the
    ///   policy is `fail`
    pub async fn run(&self, date: &str) -> Result<Vec<Record>, GazetteError> {
        tracing::info!("Fetching source page {}", self.source_url);

        let html = match self.fetcher.fetch_source(self.source_url.as_str()).await {
            Ok(html) => html,
            Err(e) => match self.on_source_failure {
                SourceFailurePolicy::Fail => {
                    return Err(GazetteError::SourceFetch {
                        url: self.source_url.to_string(),
                        source: e,
                    });
                }
                SourceFailurePolicy::Empty => {
                    tracing::warn!("Source page unavailable ({}), publishing an empty snapshot", e);
                    return Ok(Vec::new());
                }
            },
        };

        let records = self.extractor.extract(&html, &self.source_url, date).await;
        tracing::info!("Extracted {} records for {}", records.len(), date);

        Ok(records)
    }
}
