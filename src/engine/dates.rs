//! Start/end date extraction from document text.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{ExtractedDates, NOT_AVAILABLE};

// Label, optional colon, any whitespace (newlines included), then
// DD-MM-YYYY or DD/MM/YYYY. Calendar validity is not checked.
const START_PATTERN: &str = r"Start Date\s*:?\s*([0-9]{2}[-/][0-9]{2}[-/][0-9]{4})";
const END_PATTERN: &str = r"End Date\s*:?\s*([0-9]{2}[-/][0-9]{2}[-/][0-9]{4})";

fn start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(START_PATTERN).expect("start date pattern is valid"))
}

fn end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(END_PATTERN).expect("end date pattern is valid"))
}

/// Pulls the `Start Date` and `End Date` literals out of a document.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First match for each label, or `"N/A"` when the label is missing.
    pub fn extract(&self, content: &str) -> ExtractedDates {
        let start_date = first_capture(start_regex(), content);
        let end_date = first_capture(end_regex(), content);
        log::debug!("date extraction: start={start_date} end={end_date}");
        ExtractedDates {
            start_date,
            end_date,
        }
    }
}

fn first_capture(re: &Regex, content: &str) -> String {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
