//! Writes `.rcad` store files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::index::{KeywordIndex, PriorityIndex};
use crate::types::{Document, TriageError, TriageResult};

use super::{flags, FileHeader, FORMAT_VERSION};

/// Borrowed view of everything that goes into a store file.
pub struct StoreSnapshot<'a> {
    pub next_id: u64,
    pub documents: Vec<&'a Document>,
    pub priority_index: Option<&'a PriorityIndex>,
    pub keyword_index: Option<&'a KeywordIndex>,
}

/// Encoder for the current format version.
pub struct StoreWriter {
    version: u32,
}

impl StoreWriter {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
        }
    }

    /// Writer emitting an older format version. Index sections are only
    /// written for version 2 and later.
    pub fn with_version(version: u32) -> Self {
        Self { version }
    }

    /// Encode a snapshot into file bytes.
    pub fn encode(&self, snapshot: &StoreSnapshot<'_>) -> TriageResult<Vec<u8>> {
        let with_indexes = self.version >= 2;
        let priority_index = snapshot.priority_index.filter(|_| with_indexes);
        let keyword_index = snapshot.keyword_index.filter(|_| with_indexes);

        let mut header_flags = 0;
        if priority_index.is_some() {
            header_flags |= flags::PRIORITY_INDEX;
        }
        if keyword_index.is_some() {
            header_flags |= flags::KEYWORD_INDEX;
        }

        let header = FileHeader {
            version: self.version,
            flags: header_flags,
            next_id: snapshot.next_id,
            record_count: snapshot.documents.len() as u64,
        };

        let json = serde_json::to_vec(&snapshot.documents)?;
        let records = lz4_flex::compress_prepend_size(&json);

        let mut buf = Vec::with_capacity(super::HEADER_SIZE + 8 + records.len());
        buf.extend_from_slice(&header.to_bytes());
        push_section(&mut buf, &records);
        if let Some(index) = priority_index {
            push_section(&mut buf, &index.to_bytes());
        }
        if let Some(index) = keyword_index {
            push_section(&mut buf, &index.to_bytes());
        }
        Ok(buf)
    }

    /// Encode and replace the file at `path` via a temp file and rename.
    pub fn write_to_file(&self, snapshot: &StoreSnapshot<'_>, path: &Path) -> TriageResult<()> {
        let bytes = self.encode(snapshot)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TriageError::storage("write", e))?;
        }

        let tmp = temp_path(path);
        let result = fs::File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, path));

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(TriageError::storage("write", e));
        }
        Ok(())
    }
}

impl Default for StoreWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_section(buf: &mut Vec<u8>, section: &[u8]) {
    buf.extend_from_slice(&(section.len() as u64).to_le_bytes());
    buf.extend_from_slice(section);
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
