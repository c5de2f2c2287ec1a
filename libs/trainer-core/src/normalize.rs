//! Text normalization for matching and comparison.
//!
//! `normalize` folds accents, case and punctuation so that "¡Buenos días!"
//! and "buenos dias" compare equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for comparison.
///
/// Lowercases, decomposes accented characters (NFD), drops combining marks,
/// turns every non-alphanumeric, non-whitespace character into a space,
/// collapses whitespace runs and trims.
pub fn normalize(text: &str) -> String {
    // Lowercasing first: some capitals (e.g. 'İ') lowercase into a combining sequence.
    let lowered = text.to_lowercase();
    let folded: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized tokens of a text.
pub fn tokens(text: &str) -> Vec<String> {
    normalize(text).split(' ').filter(|t| !t.is_empty()).map(String::from).collect()
}

/// Whether two texts are equal after normalization.
pub fn equivalent(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
