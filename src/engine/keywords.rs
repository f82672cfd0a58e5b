//! Frequency-based keyword ranking.

use std::collections::HashMap;

use crate::types::{TriageResult, MAX_KEYWORDS};

use super::tokenizer::Tokenizer;

/// Anything that can turn document text into a ranked keyword list.
///
/// Upload treats an `Err` as "no keywords" for that document and moves on.
pub trait KeywordGenerator {
    fn generate(&self, text: &str) -> TriageResult<Vec<String>>;
}

/// A ranked keyword with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedKeyword {
    pub term: String,
    pub count: u32,
}

/// Counts candidate tokens and keeps the most frequent ones.
///
/// Equal counts keep first-occurrence order, so ranking the same text
/// always yields the same list.
pub struct KeywordRanker {
    tokenizer: Tokenizer,
    limit: usize,
}

impl KeywordRanker {
    /// Ranker returning at most [`MAX_KEYWORDS`] entries.
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            limit: MAX_KEYWORDS,
        }
    }

    /// Ranker with a smaller cap. Values above [`MAX_KEYWORDS`] are clamped.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            limit: limit.min(MAX_KEYWORDS),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank every distinct candidate token, highest count first.
    pub fn rank_all(&self, text: &str) -> Vec<RankedKeyword> {
        let mut ranked: Vec<RankedKeyword> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for token in self.tokenizer.candidate_tokens(text) {
            match positions.get(&token) {
                Some(&pos) => ranked[pos].count += 1,
                None => {
                    positions.insert(token.clone(), ranked.len());
                    ranked.push(RankedKeyword {
                        term: token,
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-seen order among ties.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Top keywords with counts.
    pub fn rank(&self, text: &str) -> Vec<RankedKeyword> {
        let mut ranked = self.rank_all(text);
        ranked.truncate(self.limit);
        ranked
    }

    /// Top keywords, terms only.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let keywords: Vec<String> = self.rank(text).into_iter().map(|k| k.term).collect();
        log::debug!("generated keywords: {:?}", keywords);
        keywords
    }
}

impl Default for KeywordRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordGenerator for KeywordRanker {
    fn generate(&self, text: &str) -> TriageResult<Vec<String>> {
        Ok(self.keywords(text))
    }
}
