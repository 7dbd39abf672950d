//! Title classification for gazette entries
//!
//! Every entry is assigned exactly one [`Category`] by scanning its title for
//! keywords. Rules are evaluated top to bottom and the first match wins, so
//! the order of [`CATEGORY_RULES`] is part of the behavior.

mod fold;

pub use fold::fold;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed category taxonomy of gazette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Yönetmelik")]
    Regulation,
    #[serde(rename = "Tebliğ")]
    Communique,
    #[serde(rename = "Karar")]
    Decision,
    #[serde(rename = "İlan")]
    Notice,
    #[serde(rename = "Diğer")]
    Other,
}

impl Category {
    /// Label used in snapshots and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Regulation => "Yönetmelik",
            Self::Communique => "Tebliğ",
            Self::Decision => "Karar",
            Self::Notice => "İlan",
            Self::Other => "Diğer",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a regulation introduces new rules or amends existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    #[serde(rename = "Yeni")]
    New,
    #[serde(rename = "Değişiklik")]
    Amendment,
}

impl Subtype {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Yeni",
            Self::Amendment => "Değişiklik",
        }
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered (category, keywords) rules; native and ASCII spellings side by side
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Regulation, &["yönetmelik", "yonetmelik"]),
    (Category::Communique, &["tebliğ", "teblig"]),
    (Category::Decision, &["karar"]),
    (Category::Notice, &["ilan"]),
];

/// Phrases marking a regulation that modifies or repeals an existing one
pub const AMENDMENT_KEYPHRASES: &[&str] = &[
    "değişiklik",
    "degisiklik",
    "yürürlükten kaldırılmasına",
    "yururlukten kaldirilmasina",
];

/// Classifies a title into its category
///
/// Matching is a case- and dot-insensitive substring search over
/// [`CATEGORY_RULES`] in order. Titles matching no rule are [`Category::Other`].
///
/// # Examples
///
/// ```
/// use gazette_scraper::classify::{classify_title, Category};
///
/// assert_eq!(classify_title("2024/123 sayılı Karar"), Category::Decision);
/// assert_eq!(classify_title("YÖNETMELİK"), Category::Regulation);
/// assert_eq!(classify_title("Yargı Bölümü"), Category::Other);
/// ```
pub fn classify_title(title: &str) -> Category {
    let folded = fold(title);

    for (category, keywords) in CATEGORY_RULES {
        if contains_any(&folded, keywords) {
            return *category;
        }
    }

    Category::Other
}

/// Determines whether a regulation title announces an amendment
pub fn classify_subtype(title: &str) -> Subtype {
    if contains_any(&fold(title), AMENDMENT_KEYPHRASES) {
        Subtype::Amendment
    } else {
        Subtype::New
    }
}

fn contains_any(folded: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| folded.contains(fold(kw).as_str()))
}
