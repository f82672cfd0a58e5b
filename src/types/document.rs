//! Document records as persisted in the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{TriageError, TriageResult};

/// Placeholder stored when a date label is absent from the text.
pub const NOT_AVAILABLE: &str = "N/A";

/// Priority tier assigned to a document during upload review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }

    /// Human-readable label for review prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::P1 => "P1 (Critical)",
            Self::P2 => "P2 (Normal)",
            Self::P3 => "P3 (Low)",
        }
    }

    /// Parse a tier name, case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }

    /// Guess the tier from a filename.
    ///
    /// Exactly one of `P1`/`P2`/`P3` (any case) must appear in the name;
    /// a name mentioning none or several tiers yields `None` and the user
    /// has to pick one.
    pub fn detect_from_name(file_name: &str) -> Option<Self> {
        let upper = file_name.to_ascii_uppercase();
        let mut found = Self::ALL.iter().filter(|p| upper.contains(p.as_str()));
        match (found.next(), found.next()) {
            (Some(p), None) => Some(*p),
            _ => None,
        }
    }

    /// Compact tag used by the on-disk priority index.
    pub(crate) fn tag(&self) -> u8 {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::P1),
            2 => Some(Self::P2),
            3 => Some(Self::P3),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TriageError;

    fn from_str(s: &str) -> TriageResult<Self> {
        Self::from_name(s).ok_or_else(|| TriageError::InvalidPriority(s.to_string()))
    }
}

/// Start and end dates pulled out of a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDates {
    pub start_date: String,
    pub end_date: String,
}

impl Default for ExtractedDates {
    fn default() -> Self {
        Self {
            start_date: NOT_AVAILABLE.to_string(),
            end_date: NOT_AVAILABLE.to_string(),
        }
    }
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub name: String,
    pub priority: Priority,
    pub content: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub upload_date: String,
}

impl NewDocument {
    /// Assemble a record stamped with the current time and no keywords.
    pub fn new(
        name: impl Into<String>,
        priority: Priority,
        content: impl Into<String>,
        dates: ExtractedDates,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            content: content.into(),
            start_date: dates.start_date,
            end_date: dates.end_date,
            keywords: Vec::new(),
            upload_date: now_iso8601(),
        }
    }

    /// Attach the id handed out by the store.
    pub fn with_id(self, id: u64) -> Document {
        Document {
            id,
            name: self.name,
            priority: self.priority,
            content: self.content,
            start_date: self.start_date,
            end_date: self.end_date,
            keywords: self.keywords,
            upload_date: self.upload_date,
        }
    }
}

/// A stored document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: u64,
    pub name: String,
    pub priority: Priority,
    pub content: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub upload_date: String,
}

impl Document {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn dates(&self) -> ExtractedDates {
        ExtractedDates {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
