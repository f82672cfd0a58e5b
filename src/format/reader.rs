//! Reads `.rcad` store files.

use std::path::Path;

use crate::index::{KeywordIndex, PriorityIndex};
use crate::types::{Document, TriageError, TriageResult};

use super::{flags, FileHeader, FORMAT_VERSION, HEADER_SIZE};

/// Decoded contents of a store file. Index sections are `None` when the
/// file does not carry them.
pub struct StoreImage {
    pub header: FileHeader,
    pub documents: Vec<Document>,
    pub priority_index: Option<PriorityIndex>,
    pub keyword_index: Option<KeywordIndex>,
}

pub struct StoreReader;

impl StoreReader {
    pub fn read_from_file(path: &Path) -> TriageResult<StoreImage> {
        let data = std::fs::read(path).map_err(|e| TriageError::storage("read", e))?;
        Self::decode(&data)
    }

    pub fn decode(data: &[u8]) -> TriageResult<StoreImage> {
        let header = FileHeader::from_bytes(data).ok_or_else(|| corrupt("bad header or magic"))?;
        if header.version == 0 || header.version > FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version {} (this build reads up to {})",
                header.version, FORMAT_VERSION
            )));
        }

        let mut rest = &data[HEADER_SIZE..];
        let records = take_section(&mut rest).ok_or_else(|| corrupt("truncated records section"))?;
        let json = lz4_flex::decompress_size_prepended(records)
            .map_err(|e| corrupt(format!("records section: {e}")))?;
        let documents: Vec<Document> = serde_json::from_slice(&json)?;

        if documents.len() as u64 != header.record_count {
            return Err(corrupt(format!(
                "header announces {} records, found {}",
                header.record_count,
                documents.len()
            )));
        }

        let priority_index = if header.has_flag(flags::PRIORITY_INDEX) {
            let section = take_section(&mut rest).ok_or_else(|| corrupt("truncated priority index"))?;
            Some(PriorityIndex::from_bytes(section).ok_or_else(|| corrupt("malformed priority index"))?)
        } else {
            None
        };

        let keyword_index = if header.has_flag(flags::KEYWORD_INDEX) {
            let section = take_section(&mut rest).ok_or_else(|| corrupt("truncated keyword index"))?;
            Some(KeywordIndex::from_bytes(section).ok_or_else(|| corrupt("malformed keyword index"))?)
        } else {
            None
        };

        Ok(StoreImage {
            header,
            documents,
            priority_index,
            keyword_index,
        })
    }
}

fn take_section<'a>(rest: &mut &'a [u8]) -> Option<&'a [u8]> {
    if rest.len() < 8 {
        return None;
    }
    let len = usize::try_from(u64::from_le_bytes(rest[0..8].try_into().ok()?)).ok()?;
    let body = rest.get(8..8usize.checked_add(len)?)?;
    *rest = &rest[8 + len..];
    Some(body)
}

fn corrupt(reason: impl std::fmt::Display) -> TriageError {
    TriageError::storage("decode", reason)
}
