//! Reading uploaded files into plain text.
//!
//! Plain text is decoded here. Word documents are handed to a pluggable
//! [`TextExtractor`]; the crate ships none, so without one registered
//! every `.docx` upload fails with [`TriageError::ExtractionFailed`].

use std::path::Path;

use crate::types::{TriageError, TriageResult};

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_WORD_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A file handed over by the rendering layer (picker or drop zone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Plain-text file from an in-memory string.
    pub fn text(name: impl Into<String>, content: &str) -> Self {
        Self::new(name, MIME_PLAIN_TEXT, content.as_bytes().to_vec())
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> TriageResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }
}

/// External capability that turns a binary document into raw text.
pub trait TextExtractor {
    fn extract_text(&self, file: &SourceFile) -> TriageResult<String>;
}

/// Dispatches a file to the right decoder by declared MIME type.
#[derive(Default)]
pub struct ContentReader {
    word_extractor: Option<Box<dyn TextExtractor>>,
}

impl ContentReader {
    /// Reader that only understands plain text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the Word document extractor.
    pub fn with_word_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.word_extractor = Some(extractor);
        self
    }

    pub fn supports_word(&self) -> bool {
        self.word_extractor.is_some()
    }

    /// Extract the text content of a file.
    pub fn read(&self, file: &SourceFile) -> TriageResult<String> {
        match file.mime_type.as_str() {
            MIME_PLAIN_TEXT => Ok(decode_plain_text(&file.bytes)),
            MIME_WORD_DOCUMENT => match &self.word_extractor {
                Some(extractor) => extractor.extract_text(file).map_err(|e| match e {
                    TriageError::ExtractionFailed { .. } => e,
                    other => TriageError::ExtractionFailed {
                        name: file.name.clone(),
                        reason: other.to_string(),
                    },
                }),
                None => Err(TriageError::ExtractionFailed {
                    name: file.name.clone(),
                    reason: "Word document parsing library is not available".to_string(),
                }),
            },
            _ => Err(TriageError::UnsupportedFileType {
                name: file.name.clone(),
            }),
        }
    }
}

/// UTF-8 decode with replacement characters, dropping a leading BOM.
fn decode_plain_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}
