//! Crawler module for gazette page fetching and entry extraction
//!
//! This module contains the extraction pipeline, including:
//! - HTTP fetching with retry logic
//! - HTML parsing, filtering and classification of entries
//! - Detail page dereferencing for amendment regulations
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{error_marker, page_text, Coordinator, Extractor};
pub use fetcher::{backoff_delay, build_http_client, is_retryable, Fetcher, RETRYABLE_STATUSES};
pub use parser::{
    collect_candidates, parse_entries, resolve_link, Candidate, CandidateKind, Entry, EntryFilter,
    NAVIGATION_BLACKLIST,
};

use crate::config::Config;
use crate::record::Record;
use crate::GazetteError;

/// Runs a complete extraction pass
///
/// This is the main entry point for script mode. It will:
/// 1. Build the HTTP client from configuration
/// 2. Fetch the source page
/// 3. Extract and classify entries
/// 4. Fetch detail pages for amendment regulations
///
/// # Arguments
///
/// * `config` - The runtime configuration
/// * `date` - Snapshot date, `DD.MM.YYYY`
///
/// # Returns
///
/// * `Ok(Vec<Record>)` - Records in document order
/// * `Err(GazetteError)` - The run failed
pub async fn extract(config: &Config, date: &str) -> Result<Vec<Record>, GazetteError> {
    Coordinator::new(config)?.run(date).await
}
