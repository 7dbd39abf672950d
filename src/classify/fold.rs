//! Case folding for keyword matching
//!
//! Titles are often set in capitals, and Turkish `İ` and `ı` do not lowercase
//! onto the ASCII `i` that keyword lists are written with.

/// Combining dot above, produced when lowercasing `İ`
const COMBINING_DOT_ABOVE: char = '\u{307}';

/// Folds text for keyword matching
///
/// Lowercases, drops the combining dot left behind by `İ`, and maps the
/// dotless `ı` to `i` so that `KARARI`, `Kararı` and `karari` all compare equal.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| *c != COMBINING_DOT_ABOVE)
        .map(|c| if c == 'ı' { 'i' } else { c })
        .collect()
}
