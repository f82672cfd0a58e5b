//! Phase 4: upload pipeline, app commands and configuration.

use std::path::Path;

use rca_triage::engine::{ConfirmedUpload, UploadPipeline, MIME_WORD_DOCUMENT};
use rca_triage::{
    ContentReader, DocumentStore, KeywordGenerator, KeywordRanker, NoticeLevel, Priority,
    PriorityFilter, SortOrder, SourceFile, TextExtractor, TriageApp, TriageConfig, TriageError,
    TriageResult, NOT_AVAILABLE,
};

const INCIDENT: &str = "Start Date: 01-01-2024\n\
End Date: 02-01-2024\n\
latency latency latency latency latency spiked on the checkout gateway. \
The gateway retried and the retry storm raised latency further.";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config_at(path: &Path) -> TriageConfig {
    TriageConfig::default().with_db_path(path)
}

fn memory_app() -> TriageApp {
    init_logger();
    TriageApp::with_store(TriageConfig::default(), DocumentStore::in_memory())
}

fn word_file(name: &str, text: &str) -> SourceFile {
    SourceFile::new(name, MIME_WORD_DOCUMENT, text.as_bytes().to_vec())
}

fn messages(app: &TriageApp, level: NoticeLevel) -> Vec<String> {
    app.notices()
        .iter()
        .filter(|n| n.level == level)
        .map(|n| n.message.clone())
        .collect()
}

/// Treats the raw bytes as the document text.
struct RawWordExtractor;

impl TextExtractor for RawWordExtractor {
    fn extract_text(&self, file: &SourceFile) -> TriageResult<String> {
        Ok(String::from_utf8_lossy(&file.bytes).into_owned())
    }
}

struct BrokenWordExtractor;

impl TextExtractor for BrokenWordExtractor {
    fn extract_text(&self, _file: &SourceFile) -> TriageResult<String> {
        Err(TriageError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "zip central directory missing",
        )))
    }
}

struct OfflineGenerator;

impl KeywordGenerator for OfflineGenerator {
    fn generate(&self, _text: &str) -> TriageResult<Vec<String>> {
        Err(TriageError::KeywordGenerationFailed("ranker offline".to_string()))
    }
}

/// Returns whatever it was built with, unfiltered.
struct CannedGenerator(Vec<&'static str>);

impl KeywordGenerator for CannedGenerator {
    fn generate(&self, _text: &str) -> TriageResult<Vec<String>> {
        Ok(self.0.iter().map(|k| k.to_string()).collect())
    }
}

// ==================== Content reading ====================

#[test]
fn test_reader_decodes_plain_text() {
    let reader = ContentReader::new();
    let file = SourceFile::new("bom.txt", "text/plain", b"\xEF\xBB\xBFhello \xFFworld".to_vec());
    assert_eq!(reader.read(&file).unwrap(), "hello \u{FFFD}world");
}

#[test]
fn test_reader_rejects_other_types() {
    let reader = ContentReader::new();
    let pdf = SourceFile::new("report.pdf", "application/pdf", vec![1, 2, 3]);
    let err = reader.read(&pdf).unwrap_err();
    assert!(matches!(err, TriageError::UnsupportedFileType { ref name } if name == "report.pdf"));
    assert!(err.is_per_file());
}

#[test]
fn test_reader_without_word_support() {
    let reader = ContentReader::new();
    assert!(!reader.supports_word());
    let err = reader.read(&word_file("a.docx", "x")).unwrap_err();
    assert!(matches!(err, TriageError::ExtractionFailed { .. }));
}

#[test]
fn test_reader_wraps_extractor_errors() {
    let reader = ContentReader::new().with_word_extractor(Box::new(BrokenWordExtractor));
    match reader.read(&word_file("broken.docx", "x")) {
        Err(TriageError::ExtractionFailed { name, reason }) => {
            assert_eq!(name, "broken.docx");
            assert!(reason.contains("zip central directory missing"));
        }
        other => panic!("expected ExtractionFailed, got {other:?}"),
    }
}

#[test]
fn test_source_file_from_path_guesses_mime() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes-P2.txt");
    std::fs::write(&txt, "hello").unwrap();
    let file = SourceFile::from_path(&txt).unwrap();
    assert_eq!(file.name, "notes-P2.txt");
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.bytes, b"hello");

    let docx = dir.path().join("rca.docx");
    std::fs::write(&docx, "fake").unwrap();
    assert_eq!(SourceFile::from_path(&docx).unwrap().mime_type, MIME_WORD_DOCUMENT);
}

// ==================== Pipeline ====================

#[test]
fn test_pipeline_stores_dates_and_keywords() {
    init_logger();
    let mut store = DocumentStore::in_memory();
    let reader = ContentReader::new();
    let ranker = KeywordRanker::new();
    let pipeline = UploadPipeline::new(&reader, &ranker);

    let report = pipeline.process_batch(
        &mut store,
        vec![ConfirmedUpload {
            file: SourceFile::text("incident-P1.txt", INCIDENT),
            priority: Priority::P1,
        }],
    );

    assert!(report.is_success());
    assert_eq!(report.stored, vec![1]);
    assert_eq!(report.summary(), "Successfully uploaded 1 document(s)!");

    let doc = store.get(1).unwrap();
    assert_eq!(doc.name, "incident-P1.txt");
    assert_eq!(doc.priority, Priority::P1);
    assert_eq!(doc.content, INCIDENT);
    assert_eq!(doc.start_date, "01-01-2024");
    assert_eq!(doc.end_date, "02-01-2024");
    assert_eq!(doc.keywords[0], "latency");
    assert_eq!(doc.keywords[1], "gateway");
    assert!(!doc.upload_date.is_empty());
    assert_eq!(store.find_by_keyword("latency").len(), 1);
}

#[test]
fn test_pipeline_sanitizes_generator_output() {
    let mut store = DocumentStore::in_memory();
    let reader = ContentReader::new();
    let generator = CannedGenerator(vec![
        "Kafka", "kafka", "the", "42", "ab", "broker", "incident", "0x1f", "replica",
    ]);
    let pipeline = UploadPipeline::new(&reader, &generator);

    let report = pipeline.process_batch(
        &mut store,
        vec![ConfirmedUpload {
            file: SourceFile::text("kafka.txt", "body"),
            priority: Priority::P2,
        }],
    );

    let doc = store.get(report.stored[0]).unwrap();
    assert_eq!(doc.keywords, vec!["kafka", "broker", "replica"]);
    assert_eq!(doc.start_date, NOT_AVAILABLE);
}

// ==================== App: upload ====================

#[test]
fn test_app_start_reports_success() {
    let app = memory_app();
    assert!(app.is_ready());
    assert_eq!(
        messages(&app, NoticeLevel::Info),
        vec!["Application loaded successfully."]
    );
}

#[test]
fn test_upload_end_to_end() {
    let mut app = memory_app();
    let staged = app.on_files_selected(vec![SourceFile::text("incident-P1.txt", INCIDENT)]);
    assert_eq!(staged[0].detected, Some(Priority::P1));
    assert!(!staged[0].needs_review());

    let report = app.confirm_upload().unwrap();
    assert_eq!(report.succeeded(), 1);
    assert!(app.staged().is_empty());

    let view = app.view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].start_date, "01-01-2024");
    assert!(view[0].keywords.contains(&"latency".to_string()));
    assert!(app.available_keywords().contains(&"latency".to_string()));

    let success = messages(&app, NoticeLevel::Success);
    assert_eq!(success, vec!["Successfully uploaded 1 document(s)!"]);
    assert!(messages(&app, NoticeLevel::Info).contains(&"Processing 1 document(s)...".to_string()));
}

#[test]
fn test_upload_mixed_batch_continues_past_failures() {
    let mut app = memory_app();
    app.on_files_selected(vec![
        SourceFile::new("scan-P2.pdf", "application/pdf", vec![0x25, 0x50]),
        SourceFile::text("db-P3.txt", "replica lag replica lag"),
        word_file("api-P1.docx", "gateway gateway"),
    ]);

    let report = app.confirm_upload().unwrap();
    assert_eq!(report.processed, 3);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.failures[0].file_name, "scan-P2.pdf");
    assert_eq!(report.failures[1].file_name, "api-P1.docx");
    assert_eq!(report.summary(), "Uploaded 1 of 3 documents. 2 failed.");

    assert_eq!(app.view().len(), 1);
    assert_eq!(app.view()[0].name, "db-P3.txt");
    assert_eq!(
        messages(&app, NoticeLevel::Error),
        vec!["Uploaded 1 of 3 documents. 2 failed."]
    );
}

#[test]
fn test_upload_word_document_with_extractor() {
    let mut app = memory_app().with_word_extractor(Box::new(RawWordExtractor));
    app.on_files_selected(vec![word_file(
        "api-P1.docx",
        "Start Date: 03/04/2024 gateway gateway timeout",
    )]);

    let report = app.confirm_upload().unwrap();
    assert!(report.is_success());
    let doc = app.document(report.stored[0]).unwrap();
    assert_eq!(doc.start_date, "03/04/2024");
    assert_eq!(doc.end_date, NOT_AVAILABLE);
    assert_eq!(doc.keywords, vec!["gateway", "start", "timeout"]);
}

#[test]
fn test_failing_keyword_generator_stores_without_keywords() {
    let mut app = memory_app().with_keyword_generator(Box::new(OfflineGenerator));
    app.on_files_selected(vec![SourceFile::text("dns-P2.txt", "resolver resolver")]);

    let report = app.confirm_upload().unwrap();
    assert!(report.is_success());
    assert_eq!(report.keyword_failures.len(), 1);
    assert_eq!(app.view()[0].keywords, Vec::<String>::new());

    let errors = messages(&app, NoticeLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to generate keywords for dns-P2.txt"));
    assert!(app.keywords_for_text("resolver").is_empty());
}

#[test]
fn test_missing_priority_keeps_staging() {
    let mut app = memory_app();
    app.on_files_selected(vec![
        SourceFile::text("a-P1.txt", "alpha"),
        SourceFile::text("notes.txt", "beta"),
        SourceFile::text("P1-P2.txt", "gamma"),
    ]);

    match app.confirm_upload() {
        Err(TriageError::MissingPriority { count }) => assert_eq!(count, 2),
        other => panic!("expected MissingPriority, got {other:?}"),
    }
    assert_eq!(app.staged().len(), 3);
    assert!(app.view().is_empty());

    assert!(app.set_staged_priority(1, Priority::P3));
    assert!(app.set_staged_priority(2, Priority::P2));
    assert!(!app.set_staged_priority(9, Priority::P2));
    let report = app.confirm_upload().unwrap();
    assert_eq!(report.succeeded(), 3);

    app.on_filter_changed(PriorityFilter::Only(Priority::P3), "");
    assert_eq!(app.view()[0].name, "notes.txt");
}

#[test]
fn test_cancel_upload_clears_staging() {
    let mut app = memory_app();
    app.on_files_selected(vec![SourceFile::text("a-P1.txt", "alpha")]);
    app.cancel_upload();
    assert!(app.staged().is_empty());
    assert_eq!(app.confirm_upload().unwrap().processed, 0);
}

#[test]
fn test_max_keywords_from_config() {
    init_logger();
    let config = TriageConfig::from_toml("max_keywords = 3\ndb_path = \"unused.rcad\"").unwrap();
    let mut app = TriageApp::with_store(config, DocumentStore::in_memory());
    app.on_files_selected(vec![SourceFile::text(
        "x-P2.txt",
        "alpha alpha alpha alpha bravo bravo bravo charlie charlie delta",
    )]);
    app.confirm_upload().unwrap();
    assert_eq!(app.view()[0].keywords, vec!["alpha", "bravo", "charlie"]);
}

// ==================== App: delete, filters, sort ====================

#[test]
fn test_delete_requires_confirmation() {
    let mut app = memory_app();
    app.on_files_selected(vec![SourceFile::text("incident-P1.txt", INCIDENT)]);
    let id = app.confirm_upload().unwrap().stored[0];
    app.take_notices();

    let confirmation = app.on_delete_requested(id);
    assert_eq!(confirmation.id(), id);
    assert_eq!(
        confirmation.prompt(),
        "Are you sure you want to delete \"incident-P1.txt\"?"
    );
    assert_eq!(app.view().len(), 1);

    app.confirm_delete(confirmation).unwrap();
    assert!(app.view().is_empty());
    assert!(app.available_keywords().is_empty());
    assert_eq!(
        messages(&app, NoticeLevel::Success),
        vec!["Document deleted successfully!"]
    );
}

#[test]
fn test_delete_unknown_id_succeeds() {
    let mut app = memory_app();
    let confirmation = app.on_delete_requested(77);
    assert_eq!(confirmation.name(), "document 77");
    app.confirm_delete(confirmation).unwrap();
}

#[test]
fn test_filters_and_sort_through_app() {
    let mut app = memory_app();
    app.on_files_selected(vec![
        SourceFile::text("beta-P1.txt", "kafka kafka"),
        SourceFile::text("Alpha-P1.txt", "dns dns"),
        SourceFile::text("gamma-P2.txt", "kafka kafka"),
    ]);
    app.confirm_upload().unwrap();

    assert_eq!(app.on_sort_toggled(), SortOrder::Descending);
    app.on_filter_changed(PriorityFilter::Only(Priority::P1), "");
    let names: Vec<&str> = app.view().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["beta-P1.txt", "Alpha-P1.txt"]);

    app.on_filter_changed(PriorityFilter::All, "kafka");
    assert_eq!(app.on_sort_toggled(), SortOrder::Ascending);
    let names: Vec<&str> = app.view().iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["beta-P1.txt", "gamma-P2.txt"]);

    app.reset_filters();
    assert_eq!(app.view().len(), 3);
}

// ==================== App: storage ====================

#[test]
fn test_unavailable_store_degrades_gracefully() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let mut app = TriageApp::start(config_at(dir.path()));

    assert!(!app.is_ready());
    assert!(matches!(app.store(), Err(TriageError::StorageUnavailable)));
    let errors = messages(&app, NoticeLevel::Error);
    assert!(errors[0].starts_with("Application failed to start:"));

    app.on_files_selected(vec![SourceFile::text("a-P1.txt", "alpha")]);
    assert!(matches!(
        app.confirm_upload(),
        Err(TriageError::StorageUnavailable)
    ));
    assert_eq!(app.staged().len(), 1);

    assert!(matches!(app.refresh(), Err(TriageError::StorageUnavailable)));
    assert!(messages(&app, NoticeLevel::Error).contains(&"Failed to load documents.".to_string()));

    let confirmation = app.on_delete_requested(1);
    assert!(matches!(
        app.confirm_delete(confirmation),
        Err(TriageError::StorageUnavailable)
    ));
}

#[test]
fn test_uploads_survive_restart() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("data").join("docs.rcad");

    {
        let mut app = TriageApp::start(config_at(&db));
        assert!(app.is_ready());
        app.on_files_selected(vec![SourceFile::text("incident-P1.txt", INCIDENT)]);
        app.confirm_upload().unwrap();
    }

    let app = TriageApp::start(config_at(&db));
    assert_eq!(app.view().len(), 1);
    assert_eq!(app.view()[0].end_date, "02-01-2024");
    assert_eq!(app.store().unwrap().find_by_priority(Priority::P1).len(), 1);
}

#[test]
fn test_text_helpers() {
    let app = memory_app();
    assert_eq!(app.keywords_for_text("queue queue disk"), vec!["queue", "disk"]);
    let dates = app.dates_for_text("End Date: 09-09-2023");
    assert_eq!(dates.start_date, NOT_AVAILABLE);
    assert_eq!(dates.end_date, "09-09-2023");
}

// ==================== Config ====================

#[test]
fn test_config_from_toml() {
    let config = TriageConfig::from_toml("db_path = \"/tmp/x.rcad\"\nmax_keywords = 5\n").unwrap();
    assert_eq!(config.db_path, Path::new("/tmp/x.rcad"));
    assert_eq!(config.max_keywords, 5);

    let defaults = TriageConfig::from_toml("").unwrap();
    assert_eq!(defaults, TriageConfig::default());
}

#[test]
fn test_config_rejects_out_of_range_values() {
    for raw in ["max_keywords = 0", "max_keywords = 11", "db_path = \"\"", "max_keywords = \"x\""] {
        assert!(
            matches!(TriageConfig::from_toml(raw), Err(TriageError::Config(_))),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert_eq!(
        TriageConfig::load(Some(missing.as_path())).unwrap(),
        TriageConfig::default()
    );

    let path = dir.path().join("config.toml");
    std::fs::write(&path, "max_keywords = 4\n").unwrap();
    assert_eq!(TriageConfig::load(Some(path.as_path())).unwrap().max_keywords, 4);

    std::fs::write(&path, "max_keywords = 40\n").unwrap();
    match TriageConfig::load(Some(path.as_path())) {
        Err(TriageError::Config(msg)) => assert!(msg.contains("config.toml")),
        other => panic!("expected Config error, got {other:?}"),
    }
}
