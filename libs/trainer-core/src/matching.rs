//! Detection of vocabulary items inside generated sentences.
//!
//! Single words must match a whole token ("art" never matches "cart").
//! Phrases must match a contiguous run of whole tokens.

use std::collections::HashSet;

use crate::normalize::tokens;

/// Normalized view of one sentence, reusable across many candidates.
#[derive(Debug, Clone)]
pub struct SentenceIndex {
    tokens: Vec<String>,
    token_set: HashSet<String>,
}

impl SentenceIndex {
    pub fn new(sentence: &str) -> Self {
        let tokens = tokens(sentence);
        let token_set = tokens.iter().cloned().collect();
        Self { tokens, token_set }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the (raw) candidate appears in the sentence.
    pub fn contains(&self, candidate: &str) -> bool {
        let needle = tokens(candidate);
        match needle.as_slice() {
            [] => false,
            [single] => self.token_set.contains(single),
            phrase => self.contains_phrase(phrase),
        }
    }

    fn contains_phrase(&self, phrase: &[String]) -> bool {
        if phrase.len() > self.tokens.len() {
            return false;
        }
        self.tokens.windows(phrase.len()).any(|window| window == phrase)
    }
}

/// Return the candidates found in `sentence`, in input order and original spelling.
pub fn match_words<'a, S: AsRef<str>>(sentence: &str, candidates: &'a [S]) -> Vec<&'a str> {
    let index = SentenceIndex::new(sentence);
    if index.is_empty() {
        return Vec::new();
    }

    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| index.contains(candidate))
        .collect()
}
