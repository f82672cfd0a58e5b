//! Local triage store for incident post-mortem documents.
//!
//! Uploaded documents get a priority tier, `Start Date`/`End Date` fields
//! and up to ten frequency-ranked keywords, and are kept in a single-file
//! store with priority and keyword indexes. [`TriageApp`] exposes the
//! command interface a front end drives; the pieces underneath
//! ([`KeywordRanker`], [`DateExtractor`], [`DocumentStore`],
//! [`DocumentRepository`]) are usable on their own.

pub mod app;
pub mod config;
pub mod engine;
pub mod format;
pub mod index;
pub mod repository;
pub mod store;
pub mod types;

pub use app::{DeleteConfirmation, Notice, NoticeLevel, TriageApp};
pub use config::TriageConfig;
pub use engine::{
    ContentReader, DateExtractor, KeywordGenerator, KeywordRanker, SourceFile, TextExtractor,
    Tokenizer, UploadReport,
};
pub use index::{KeywordIndex, PriorityIndex};
pub use repository::{DocumentFilter, DocumentRepository, PriorityFilter, SortOrder};
pub use store::DocumentStore;
pub use types::{
    Document, ExtractedDates, NewDocument, Priority, TriageError, TriageResult, MAX_KEYWORDS,
    NOT_AVAILABLE,
};
