//! Error types for the triage store and its pipeline.

use thiserror::Error;

/// Every failure the core can report.
///
/// Only [`TriageError::StorageInitFailed`] is fatal for a session; the
/// remaining variants are reported per operation or per file.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("failed to open document store: {0}")]
    StorageInitFailed(String),

    #[error("document store is not available")]
    StorageUnavailable,

    #[error("store operation '{operation}' failed: {reason}")]
    StorageOperationFailed {
        operation: &'static str,
        reason: String,
    },

    #[error("Unsupported file type: {name}. Please upload a .txt or .docx file.")]
    UnsupportedFileType { name: String },

    #[error("Could not extract text from {name}: {reason}")]
    ExtractionFailed { name: String, reason: String },

    #[error("Failed to generate keywords: {0}")]
    KeywordGenerationFailed(String),

    #[error("Please select a priority (P1, P2, or P3) for all files. {count} file(s) have none.")]
    MissingPriority { count: usize },

    #[error("invalid priority '{0}', expected P1, P2 or P3")]
    InvalidPriority(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("document {0} not found")]
    NotFound(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriageError {
    /// Wrap any displayable failure as a failed store operation.
    pub fn storage(operation: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::StorageOperationFailed {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Whether the failure is confined to a single uploaded file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFileType { .. }
                | Self::ExtractionFailed { .. }
                | Self::KeywordGenerationFailed(_)
        )
    }
}

/// Convenience alias used across the crate.
pub type TriageResult<T> = Result<T, TriageError>;
