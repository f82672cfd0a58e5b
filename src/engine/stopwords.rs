//! Fixed stop word set for keyword ranking.
//!
//! General English function words plus incident-report jargon and the
//! calendar, timezone and vendor abbreviations that show up in almost every
//! post-mortem. The set is built once and never mutated.

use std::collections::HashSet;
use std::sync::OnceLock;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do",
    "does", "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from",
    "further", "had", "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "he'd",
    "he'll", "he's", "her", "here", "here's", "hers", "herself", "him", "himself", "his", "how",
    "how's", "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's",
    "its", "itself", "let's", "me", "more", "most", "mustn't", "my",
    "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shan't", "she",
    "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such", "than", "that",
    "that's", "the", "their", "theirs", "them", "themselves", "then", "there", "there's",
    "these", "they", "they'd", "they'll", "they're", "they've", "this", "those", "through",
    "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll",
    "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where",
    "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your",
    "yours", "yourself", "yourselves",
];

const INCIDENT_JARGON: &[&str] = &[
    "rca", "post", "mortem", "incident", "issue", "problem", "service", "outage",
    "error", "failure", "system", "database", "server", "client", "request", "response",
    "date", "time", "team", "summary", "action", "item", "items", "impact", "root", "cause",
    "timeline", "detection", "resolution", "lesson", "learned", "solution", "mitigation",
    "investigation", "analysis", "status", "description", "ticket", "jira", "bug", "report",
    "customer", "user",
];

const CALENDAR_AND_VENDORS: &[&str] = &[
    "http", "https", "www", "com", "org", "net", "gmt", "utc", "ist", "pst", "est", "gcp",
    "aws", "azure", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct",
    "nov", "dec",
];

/// The process-wide stop word set.
pub fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        ENGLISH
            .iter()
            .chain(INCIDENT_JARGON)
            .chain(CALENDAR_AND_VENDORS)
            .copied()
            .collect()
    })
}

pub fn is_stop_word(token: &str) -> bool {
    stop_words().contains(token)
}

/// Whether a token reads entirely as a number.
///
/// Tokens are runs of `[a-z0-9_]`, so this covers plain digits, exponent
/// forms like `1e5` and the `0x`/`0o`/`0b` radix prefixes.
pub fn is_numeric(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    if let Some(rest) = token.get(2..) {
        let radix = match &token[..2] {
            "0x" => Some(16),
            "0o" => Some(8),
            "0b" => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return !rest.is_empty() && rest.chars().all(|c| c.is_digit(radix));
        }
    }
    match token.split_once('e') {
        Some((mantissa, exponent)) => {
            !mantissa.is_empty()
                && !exponent.is_empty()
                && mantissa.bytes().all(|b| b.is_ascii_digit())
                && exponent.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Stop word membership or numeric form: either rejects the token.
pub fn is_rejected(token: &str) -> bool {
    is_stop_word(token) || is_numeric(token)
}
