//! HTML parser for extracting gazette entries
//!
//! The homepage presents entries both as links and as plain table cells, so
//! both tag kinds are collected in one document-order pass and funneled
//! through the same normalization and filter chain.

use crate::classify::{classify_subtype, classify_title, fold, Category, Subtype};
use crate::config::ExtractConfig;
use crate::text::inline_text;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Site navigation and footer strings that look like entries but aren't
pub const NAVIGATION_BLACKLIST: &[&str] = &[
    "Resmî Gazete",
    "Resmi Gazete",
    "Ana Sayfa",
    "Önceki Günler",
    "Mükerrer Sayılar",
    "Resmî Gazete Arşivi",
    "Resmi Gazete Arşivi",
    "Yürütme ve İdare Bölümü",
    "YÜRÜTME VE İDARE BÖLÜMÜ",
    "Yargı Bölümü",
    "YARGI BÖLÜMÜ",
    "İlân Bölümü",
    "İLÂN BÖLÜMÜ",
    "İletişim",
    "Site Haritası",
    "Kişisel Verilerin Korunması",
    "Gizlilik Politikası",
    "Erişilebilirlik",
    "T.C. Cumhurbaşkanlığı",
    "Cumhurbaşkanlığı İdari İşler Başkanlığı",
    "Tüm Hakları Saklıdır",
];

/// The closed set of element kinds that can carry an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// `<a>` element
    Anchor,
    /// `<td>` element
    Cell,
}

impl CandidateKind {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "a" => Some(Self::Anchor),
            "td" => Some(Self::Cell),
            _ => None,
        }
    }
}

/// An element that might be a gazette entry
#[derive(Debug, Clone)]
pub struct Candidate {
    pub kind: CandidateKind,
    /// Normalized visible text
    pub text: String,
    /// Raw `href` attribute of the element itself
    pub href: Option<String>,
}

/// A classified entry with its resolved link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    /// Absolute URL
    pub link: String,
    pub category: Category,
    /// Set for regulations only
    pub subtype: Option<Subtype>,
}

impl Entry {
    /// Returns true if the detail page text should be fetched
    pub fn is_amendment(&self) -> bool {
        self.subtype == Some(Subtype::Amendment)
    }
}

/// Title filter applied to every candidate
#[derive(Debug, Clone)]
pub struct EntryFilter {
    min_title_chars: usize,
    blacklist: HashSet<String>,
    date_header_marker: String,
}

impl EntryFilter {
    /// Builds the filter from configuration plus the built-in blacklist
    pub fn from_config(config: &ExtractConfig) -> Self {
        let blacklist = NAVIGATION_BLACKLIST
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_blacklist.iter().cloned())
            .collect();

        Self {
            min_title_chars: config.min_title_chars,
            blacklist,
            date_header_marker: fold(&config.date_header_marker),
        }
    }

    /// Returns true if `title` (already normalized) may be an entry
    ///
    /// Rejects titles that are too short, exact blacklist matches, and date
    /// headers (matched case-insensitively on the marker phrase).
    pub fn accepts(&self, title: &str) -> bool {
        if title.chars().count() < self.min_title_chars {
            return false;
        }

        if self.blacklist.contains(title) {
            return false;
        }

        !fold(title).contains(&self.date_header_marker)
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::from_config(&ExtractConfig::default())
    }
}

/// Collects anchor and cell candidates in document order
pub fn collect_candidates(document: &Html) -> Vec<Candidate> {
    let selector = match Selector::parse("a, td") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(to_candidate)
        .collect()
}

fn to_candidate(element: ElementRef<'_>) -> Option<Candidate> {
    let kind = CandidateKind::from_tag(element.value().name())?;

    Some(Candidate {
        kind,
        text: inline_text(element),
        href: element.value().attr("href").map(str::to_string),
    })
}

/// Parses the homepage and returns classified entries in document order
///
/// # Arguments
///
/// * `html` - Raw markup of the source page
/// * `base_url` - The source page URL, used to resolve relative links
/// * `filter` - Title filter
///
/// # Example
///
/// ```
/// use gazette_scraper::crawler::{parse_entries, EntryFilter};
/// use gazette_scraper::Category;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/eskiler/k1.htm">2024/123 sayılı Karar</a></body></html>"#;
/// let base = Url::parse("https://www.resmigazete.gov.tr/").unwrap();
/// let entries = parse_entries(html, &base, &EntryFilter::default());
///
/// assert_eq!(entries[0].category, Category::Decision);
/// assert_eq!(entries[0].link, "https://www.resmigazete.gov.tr/eskiler/k1.htm");
/// ```
pub fn parse_entries(html: &str, base_url: &Url, filter: &EntryFilter) -> Vec<Entry> {
    let document = Html::parse_document(html);

    collect_candidates(&document)
        .into_iter()
        .filter_map(|candidate| to_entry(candidate, base_url, filter))
        .collect()
}

fn to_entry(candidate: Candidate, base_url: &Url, filter: &EntryFilter) -> Option<Entry> {
    if !filter.accepts(&candidate.text) {
        return None;
    }

    let link = resolve_link(candidate.href.as_deref()?, base_url)?;
    let category = classify_title(&candidate.text);
    let subtype = (category == Category::Regulation).then(|| classify_subtype(&candidate.text));

    Some(Entry {
        title: candidate.text,
        link,
        category,
        subtype,
    })
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
