//! Multi-entry keyword index mapping each keyword to the documents carrying it.

use std::collections::HashMap;

use crate::types::Document;

/// An inverted index mapping keywords to posting lists (sorted document ids).
///
/// A document with ten keywords appears in ten posting lists.
pub struct KeywordIndex {
    /// keyword → sorted Vec of document ids
    postings: HashMap<String, Vec<u64>>,
}

impl KeywordIndex {
    /// Create an empty keyword index.
    pub fn new() -> Self {
        Self {
            postings: HashMap::new(),
        }
    }

    /// Build the index from a set of documents.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut index = Self::new();
        for doc in documents {
            index.add_document(doc);
        }
        index
    }

    /// Look up a keyword. Returns sorted document ids.
    pub fn get(&self, keyword: &str) -> &[u64] {
        self.postings
            .get(keyword)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct keywords.
    pub fn keyword_count(&self) -> usize {
        self.postings.len()
    }

    /// All indexed keywords, sorted.
    pub fn keywords(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.postings.keys().map(|k| k.as_str()).collect();
        terms.sort_unstable();
        terms
    }

    /// Index every keyword of a document.
    pub fn add_document(&mut self, doc: &Document) {
        for keyword in &doc.keywords {
            let posting = self.postings.entry(keyword.clone()).or_default();
            if let Err(pos) = posting.binary_search(&doc.id) {
                posting.insert(pos, doc.id);
            }
        }
    }

    /// Drop a document from the posting lists of its keywords.
    pub fn remove_document(&mut self, doc: &Document) {
        for keyword in &doc.keywords {
            if let Some(posting) = self.postings.get_mut(keyword) {
                if let Ok(pos) = posting.binary_search(&doc.id) {
                    posting.remove(pos);
                }
                if posting.is_empty() {
                    self.postings.remove(keyword);
                }
            }
        }
    }

    /// Serialize the keyword index to bytes for file writing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();

        buf.extend_from_slice(&(self.postings.len() as u32).to_le_bytes());

        // Sort keywords for deterministic output
        for keyword in self.keywords() {
            let ids = &self.postings[keyword];
            let bytes = keyword.as_bytes();
            buf.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
            buf.extend_from_slice(bytes);
            buf.extend_from_slice(&(ids.len() as u32).to_le_bytes());
            for &id in ids {
                buf.extend_from_slice(&id.to_le_bytes());
            }
        }

        buf
    }

    /// Deserialize a keyword index from bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let mut pos = 0;

        if data.len() < 4 {
            return None;
        }

        let keyword_count = u32::from_le_bytes(data[pos..pos + 4].try_into().ok()?) as usize;
        pos += 4;

        let mut postings = HashMap::with_capacity(keyword_count.min(data.len()));

        for _ in 0..keyword_count {
            if pos + 2 > data.len() {
                return None;
            }
            let len = u16::from_le_bytes(data[pos..pos + 2].try_into().ok()?) as usize;
            pos += 2;

            if pos + len > data.len() {
                return None;
            }
            let keyword = std::str::from_utf8(&data[pos..pos + len]).ok()?.to_string();
            pos += len;

            if pos + 4 > data.len() {
                return None;
            }
            let id_count = u32::from_le_bytes(data[pos..pos + 4].try_into().ok()?) as usize;
            pos += 4;

            if pos + id_count * 8 > data.len() {
                return None;
            }
            let mut ids = Vec::with_capacity(id_count);
            for _ in 0..id_count {
                ids.push(u64::from_le_bytes(data[pos..pos + 8].try_into().ok()?));
                pos += 8;
            }

            postings.insert(keyword, ids);
        }

        Some(Self { postings })
    }
}

impl Default for KeywordIndex {
    fn default() -> Self {
        Self::new()
    }
}
