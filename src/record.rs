//! Snapshot record type
//!
//! Field labels in the serialized form are the native labels consumers of the
//! endpoint already depend on; they must not be renamed.

use crate::classify::{Category, Subtype};
use serde::{Deserialize, Serialize};

/// One gazette entry in a daily snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Snapshot date, `DD.MM.YYYY`
    #[serde(rename = "Tarih")]
    pub date: String,

    #[serde(rename = "Kategori")]
    pub category: Category,

    /// Present for regulations only
    #[serde(
        rename = "Yönetmelik Türü",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subtype: Option<Subtype>,

    /// Whitespace-normalized entry text
    #[serde(rename = "Başlık")]
    pub title: String,

    #[serde(flatten)]
    pub attachment: Attachment,
}

/// What a record carries besides its title
///
/// Amendment regulations carry the text of their detail page; every other
/// record carries the resolved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    #[serde(rename = "HTML linki")]
    Link(String),

    #[serde(rename = "Değişiklik Kapsamı")]
    FullText(String),
}

impl Record {
    /// The resolved link, if this record carries one
    pub fn link(&self) -> Option<&str> {
        match &self.attachment {
            Attachment::Link(link) => Some(link),
            Attachment::FullText(_) => None,
        }
    }

    /// The detail page text, if this record carries it
    pub fn full_text(&self) -> Option<&str> {
        match &self.attachment {
            Attachment::FullText(text) => Some(text),
            Attachment::Link(_) => None,
        }
    }
}
