//! Upload review and the per-file ingest pipeline.
//!
//! Files are first staged with a detected priority for the user to review.
//! Once every staged file has a priority the batch is processed one file at
//! a time: read content, extract dates, add the record, rank keywords,
//! update the record. A failing file is logged and counted; the rest of
//! the batch still runs.

use std::collections::HashSet;

use crate::store::DocumentStore;
use crate::types::{
    Document, NewDocument, Priority, TriageError, TriageResult, MAX_KEYWORDS, MIN_TOKEN_LEN,
};

use super::dates::DateExtractor;
use super::extract::{ContentReader, SourceFile};
use super::keywords::KeywordGenerator;
use super::stopwords;

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

/// A selected file waiting for priority review.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub file: SourceFile,
    /// Priority guessed from the filename, if unambiguous.
    pub detected: Option<Priority>,
    /// Priority that will be used; starts as the detected one.
    pub priority: Option<Priority>,
}

impl StagedUpload {
    pub fn new(file: SourceFile) -> Self {
        let detected = Priority::detect_from_name(&file.name);
        Self {
            file,
            detected,
            priority: detected,
        }
    }

    /// Whether the user still has to choose a priority for this file.
    pub fn needs_review(&self) -> bool {
        self.priority.is_none()
    }
}

/// A staged file with its confirmed priority.
#[derive(Debug, Clone)]
pub struct ConfirmedUpload {
    pub file: SourceFile,
    pub priority: Priority,
}

/// Files selected for upload, pending review.
#[derive(Debug, Default)]
pub struct UploadStaging {
    entries: Vec<StagedUpload>,
}

impl UploadStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the staged files with a new selection.
    pub fn stage(&mut self, files: Vec<SourceFile>) -> &[StagedUpload] {
        self.entries = files.into_iter().map(StagedUpload::new).collect();
        &self.entries
    }

    pub fn entries(&self) -> &[StagedUpload] {
        &self.entries
    }

    /// Choose a priority for the file at `index`. Returns `false` if there
    /// is no such entry.
    pub fn set_priority(&mut self, index: usize, priority: Priority) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.priority = Some(priority);
                true
            }
            None => false,
        }
    }

    /// Number of staged files without a priority.
    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|e| e.needs_review()).count()
    }

    /// Take the staged batch if every file has a priority.
    ///
    /// On [`TriageError::MissingPriority`] the staging list is left intact
    /// so the user can fix it.
    pub fn confirm(&mut self) -> TriageResult<Vec<ConfirmedUpload>> {
        let missing = self.missing_count();
        if missing > 0 {
            return Err(TriageError::MissingPriority { count: missing });
        }
        Ok(std::mem::take(&mut self.entries)
            .into_iter()
            .filter_map(|entry| {
                entry.priority.map(|priority| ConfirmedUpload {
                    file: entry.file,
                    priority,
                })
            })
            .collect())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// A file that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default)]
pub struct UploadReport {
    pub processed: usize,
    /// Ids of the stored documents, in upload order.
    pub stored: Vec<u64>,
    pub failures: Vec<UploadFailure>,
    /// Files stored without keywords because ranking failed.
    pub keyword_failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.stored.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// User-facing summary line.
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!("Successfully uploaded {} document(s)!", self.succeeded())
        } else {
            format!(
                "Uploaded {} of {} documents. {} failed.",
                self.succeeded(),
                self.processed,
                self.failed()
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs confirmed uploads through extraction, dating, storage and ranking.
pub struct UploadPipeline<'a> {
    reader: &'a ContentReader,
    keywords: &'a dyn KeywordGenerator,
    dates: DateExtractor,
}

impl<'a> UploadPipeline<'a> {
    pub fn new(reader: &'a ContentReader, keywords: &'a dyn KeywordGenerator) -> Self {
        Self {
            reader,
            keywords,
            dates: DateExtractor::new(),
        }
    }

    /// Process a batch strictly in order. Never fails as a whole.
    pub fn process_batch(
        &self,
        store: &mut DocumentStore,
        uploads: Vec<ConfirmedUpload>,
    ) -> UploadReport {
        let mut report = UploadReport {
            processed: uploads.len(),
            ..UploadReport::default()
        };
        log::info!("processing {} document(s)", uploads.len());

        for upload in &uploads {
            match self.process_file(store, upload) {
                Ok(outcome) => {
                    report.stored.push(outcome.id);
                    if let Some(reason) = outcome.keyword_error {
                        report.keyword_failures.push(UploadFailure {
                            file_name: upload.file.name.clone(),
                            reason,
                        });
                    }
                }
                Err(e) => {
                    log::error!("failed to process file {}: {}", upload.file.name, e);
                    report.failures.push(UploadFailure {
                        file_name: upload.file.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "upload finished: {} stored, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Ingest a single file.
    pub fn process_file(
        &self,
        store: &mut DocumentStore,
        upload: &ConfirmedUpload,
    ) -> TriageResult<FileOutcome> {
        let content = self.reader.read(&upload.file)?;
        let dates = self.dates.extract(&content);

        let record = NewDocument::new(&upload.file.name, upload.priority, content, dates);
        let id = store.add(record.clone())?;

        let (keywords, keyword_error) = match self.keywords.generate(&record.content) {
            Ok(keywords) => (sanitize_keywords(keywords), None),
            Err(e) => {
                log::warn!(
                    "keyword generation failed for {}, storing without keywords: {}",
                    upload.file.name,
                    e
                );
                (Vec::new(), Some(e.to_string()))
            }
        };

        let document = Document {
            keywords,
            ..record.with_id(id)
        };
        store.update(document)?;

        Ok(FileOutcome { id, keyword_error })
    }
}

/// Result of ingesting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub id: u64,
    pub keyword_error: Option<String>,
}

/// Enforce the stored keyword invariants on generator output: no stop
/// words, no numeric or short tokens, no duplicates, at most ten entries.
pub fn sanitize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.to_lowercase())
        .filter(|k| k.chars().count() >= MIN_TOKEN_LEN && !stopwords::is_rejected(k))
        .filter(|k| seen.insert(k.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}
