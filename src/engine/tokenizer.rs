//! Shared tokenizer for keyword ranking.

use crate::types::MIN_TOKEN_LEN;

use super::stopwords;

/// Apostrophe forms that introduce a possessive `s`, including the
/// mis-decoded bytes of a UTF-8 right single quote.
const POSSESSIVE_MARKS: &[char] = &['\'', '\u{2019}', 'â', '€', '™'];

/// Deterministic word tokenizer.
///
/// Text is lowercased, possessive suffixes are dropped, and the remainder
/// is split into maximal runs of ASCII word characters (`[a-z0-9_]`).
/// Runs shorter than the minimum length are discarded.
pub struct Tokenizer {
    min_len: usize,
}

impl Tokenizer {
    /// Create a tokenizer with the default minimum token length.
    pub fn new() -> Self {
        Self {
            min_len: MIN_TOKEN_LEN,
        }
    }

    /// Lowercase and strip possessive suffixes.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut out = String::with_capacity(lowered.len());
        let mut chars = lowered.chars().peekable();
        while let Some(c) = chars.next() {
            if POSSESSIVE_MARKS.contains(&c) && chars.peek() == Some(&'s') {
                chars.next();
                continue;
            }
            out.push(c);
        }
        out
    }

    /// Tokenize text into lowercase word tokens, stop words included.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .filter(|token| token.len() >= self.min_len)
            .map(|s| s.to_string())
            .collect()
    }

    /// Tokenize and drop stop words and purely numeric tokens.
    pub fn candidate_tokens(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|token| !stopwords::is_rejected(token))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
