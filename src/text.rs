//! Text normalization helpers shared by titles and detail pages

use scraper::{ElementRef, Node};

/// Elements whose text content is never rendered
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Collapses every whitespace run to one space and trims both ends
///
/// Normalization is idempotent: feeding the output back in returns it unchanged.
///
/// # Example
///
/// ```
/// use gazette_scraper::text::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Resmî \n\t Gazete "), "Resmî Gazete");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates `text` to at most `max_chars` characters
///
/// Counts Unicode scalar values, never splitting inside a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Returns the normalized text of an entry element, as displayed
///
/// Text nodes are concatenated as-is, so a word split across inline tags
/// (`Yönetmeli<span>ği</span>`) stays one word; whitespace already present
/// in the markup is then collapsed.
pub fn inline_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, "", &mut raw);
    normalize_whitespace(&raw)
}

/// Returns the normalized visible text beneath an element
///
/// Text nodes are joined with a space so that adjacent blocks and cells
/// don't run together. Used for whole detail pages.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, " ", &mut raw);
    normalize_whitespace(&raw)
}

/// Appends the text beneath `element`, skipping non-rendered elements
fn collect_text(element: ElementRef<'_>, separator: &str, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push_str(separator);
            }
            Node::Element(el) if INVISIBLE_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, separator, out);
                }
            }
            _ => {}
        }
    }
}
