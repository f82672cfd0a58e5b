//! Core data types: document records, priority tiers and the crate error.

pub mod document;
pub mod error;

pub use document::{Document, ExtractedDates, NewDocument, Priority, NOT_AVAILABLE};
pub use error::{TriageError, TriageResult};

/// Upper bound on the number of keywords kept per document.
pub const MAX_KEYWORDS: usize = 10;

/// Minimum token length considered by the tokenizer.
pub const MIN_TOKEN_LEN: usize = 3;
