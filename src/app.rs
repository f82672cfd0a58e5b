//! Application state and the command interface used by a front end.
//!
//! [`TriageApp`] owns the store handle, the repository cache, the upload
//! staging list and the pending user notices. A front end (table view,
//! file picker, CLI) drives it through the `on_*` commands and reads back
//! through the query methods.

use crate::config::TriageConfig;
use crate::engine::{
    ContentReader, DateExtractor, KeywordGenerator, KeywordRanker, SourceFile, StagedUpload,
    TextExtractor, UploadPipeline, UploadReport, UploadStaging,
};
use crate::repository::{DocumentFilter, DocumentRepository, PriorityFilter, SortOrder};
use crate::store::DocumentStore;
use crate::types::{Document, ExtractedDates, Priority, TriageError, TriageResult};

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A delete the user still has to confirm. Only obtainable from
/// [`TriageApp::on_delete_requested`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: u64,
    name: String,
}

impl DeleteConfirmation {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.name)
    }
}

pub struct TriageApp {
    config: TriageConfig,
    store: Option<DocumentStore>,
    repository: DocumentRepository,
    staging: UploadStaging,
    reader: ContentReader,
    keywords: Box<dyn KeywordGenerator>,
    dates: DateExtractor,
    notices: Vec<Notice>,
}

impl TriageApp {
    /// Open the configured store and load its documents.
    ///
    /// A store that fails to open leaves the app running without storage:
    /// every store-backed command then fails with
    /// [`TriageError::StorageUnavailable`].
    pub fn start(config: TriageConfig) -> Self {
        let opened = DocumentStore::open(&config.db_path);
        Self::from_open_result(config, opened)
    }

    /// Run on top of an already opened store.
    pub fn with_store(config: TriageConfig, store: DocumentStore) -> Self {
        Self::from_open_result(config, Ok(store))
    }

    fn from_open_result(config: TriageConfig, opened: TriageResult<DocumentStore>) -> Self {
        let keywords: Box<dyn KeywordGenerator> =
            Box::new(KeywordRanker::with_limit(config.max_keywords));
        let mut app = Self {
            config,
            store: None,
            repository: DocumentRepository::new(),
            staging: UploadStaging::new(),
            reader: ContentReader::new(),
            keywords,
            dates: DateExtractor::new(),
            notices: Vec::new(),
        };

        match opened {
            Ok(store) => {
                app.repository.refresh(&store);
                app.store = Some(store);
                app.notify(NoticeLevel::Info, "Application loaded successfully.");
            }
            Err(e) => {
                log::error!("critical error during store initialization: {e}");
                app.notify(NoticeLevel::Error, format!("Application failed to start: {e}"));
            }
        }
        app
    }

    /// Register a Word document extractor.
    pub fn with_word_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.reader = std::mem::take(&mut self.reader).with_word_extractor(extractor);
        self
    }

    /// Replace the keyword generator.
    pub fn with_keyword_generator(mut self, generator: Box<dyn KeywordGenerator>) -> Self {
        self.keywords = generator;
        self
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Whether the store opened successfully.
    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> TriageResult<&DocumentStore> {
        self.store.as_ref().ok_or(TriageError::StorageUnavailable)
    }

    /// Re-read every document into the repository cache.
    pub fn refresh(&mut self) -> TriageResult<usize> {
        match &self.store {
            Some(store) => Ok(self.repository.refresh(store)),
            None => {
                self.notify(NoticeLevel::Error, "Failed to load documents.");
                Err(TriageError::StorageUnavailable)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Stage a file selection for priority review.
    pub fn on_files_selected(&mut self, files: Vec<SourceFile>) -> &[StagedUpload] {
        self.staging.stage(files)
    }

    pub fn staged(&self) -> &[StagedUpload] {
        self.staging.entries()
    }

    pub fn set_staged_priority(&mut self, index: usize, priority: Priority) -> bool {
        self.staging.set_priority(index, priority)
    }

    pub fn cancel_upload(&mut self) {
        self.staging.clear();
    }

    /// Process the staged batch.
    ///
    /// Fails without touching the staging list when a file lacks a
    /// priority or the store is unavailable. Otherwise every file is
    /// attempted and the outcome is summarized in the report.
    pub fn confirm_upload(&mut self) -> TriageResult<UploadReport> {
        let missing = self.staging.missing_count();
        if missing > 0 {
            return Err(TriageError::MissingPriority { count: missing });
        }
        if self.store.is_none() {
            return Err(TriageError::StorageUnavailable);
        }

        let batch = self.staging.confirm()?;
        self.notify(
            NoticeLevel::Info,
            format!("Processing {} document(s)...", batch.len()),
        );

        let report = match self.store.as_mut() {
            Some(store) => {
                UploadPipeline::new(&self.reader, self.keywords.as_ref()).process_batch(store, batch)
            }
            None => return Err(TriageError::StorageUnavailable),
        };

        for failure in &report.keyword_failures {
            self.notify(
                NoticeLevel::Error,
                format!("Failed to generate keywords for {}: {}", failure.file_name, failure.reason),
            );
        }
        let level = if report.is_success() {
            NoticeLevel::Success
        } else {
            NoticeLevel::Error
        };
        self.notify(level, report.summary());

        self.refresh()?;
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Ask for confirmation before deleting `id`.
    pub fn on_delete_requested(&self, id: u64) -> DeleteConfirmation {
        let name = self
            .repository
            .get(id)
            .map(|doc| doc.name.clone())
            .unwrap_or_else(|| format!("document {id}"));
        DeleteConfirmation { id, name }
    }

    /// Perform a confirmed delete and refresh the cache.
    pub fn confirm_delete(&mut self, confirmation: DeleteConfirmation) -> TriageResult<()> {
        let store = self.store.as_mut().ok_or(TriageError::StorageUnavailable)?;
        match store.delete(confirmation.id) {
            Ok(()) => {
                self.notify(NoticeLevel::Success, "Document deleted successfully!");
                self.refresh()?;
                Ok(())
            }
            Err(e) => {
                self.notify(
                    NoticeLevel::Error,
                    format!("Failed to delete document: {e}"),
                );
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Filters and sorting
    // -----------------------------------------------------------------------

    /// Set the priority and keyword filters. An empty keyword disables the
    /// keyword filter.
    pub fn on_filter_changed(&mut self, priority: PriorityFilter, keyword: &str) {
        self.repository
            .set_filter(DocumentFilter::new(priority, keyword));
    }

    /// Flip the name sort direction.
    pub fn on_sort_toggled(&mut self) -> SortOrder {
        self.repository.toggle_name_sort()
    }

    pub fn sort_by_name(&mut self, ascending: bool) {
        self.repository.sort_by_name(ascending);
    }

    pub fn reset_filters(&mut self) {
        self.repository.reset_filters();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Documents passing the active filters, in display order.
    pub fn view(&self) -> Vec<&Document> {
        self.repository.view()
    }

    pub fn available_keywords(&self) -> &[String] {
        self.repository.available_keywords()
    }

    pub fn document(&self, id: u64) -> Option<&Document> {
        self.repository.get(id)
    }

    pub fn repository(&self) -> &DocumentRepository {
        &self.repository
    }

    /// Rank keywords for arbitrary text; a failing generator yields none.
    pub fn keywords_for_text(&self, text: &str) -> Vec<String> {
        self.keywords.generate(text).unwrap_or_else(|e| {
            log::warn!("keyword generation failed: {e}");
            Vec::new()
        })
    }

    pub fn dates_for_text(&self, text: &str) -> ExtractedDates {
        self.dates.extract(text)
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => log::warn!("{message}"),
            _ => log::info!("{message}"),
        }
        self.notices.push(Notice { level, message });
    }
}
