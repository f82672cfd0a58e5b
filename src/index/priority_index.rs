//! Priority index: tier → documents in that tier.

use std::collections::BTreeMap;

use crate::types::{Document, Priority};

/// Single-valued index over `Document::priority`.
pub struct PriorityIndex {
    /// priority → sorted document ids
    buckets: BTreeMap<Priority, Vec<u64>>,
}

impl PriorityIndex {
    /// Create an empty priority index.
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Build from a set of documents.
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut index = Self::new();
        for doc in documents {
            index.add_document(doc);
        }
        index
    }

    /// Documents in a tier, sorted by id.
    pub fn get(&self, priority: Priority) -> &[u64] {
        self.buckets
            .get(&priority)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of documents in a tier.
    pub fn count(&self, priority: Priority) -> usize {
        self.get(priority).len()
    }

    /// Total number of indexed documents.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|v| v.len()).sum()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_document(&mut self, doc: &Document) {
        let bucket = self.buckets.entry(doc.priority).or_default();
        if let Err(pos) = bucket.binary_search(&doc.id) {
            bucket.insert(pos, doc.id);
        }
    }

    pub fn remove_document(&mut self, doc: &Document) {
        if let Some(bucket) = self.buckets.get_mut(&doc.priority) {
            if let Ok(pos) = bucket.binary_search(&doc.id) {
                bucket.remove(pos);
            }
        }
    }

    /// Serialize to bytes for file writing.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        buf.push(self.buckets.len() as u8);
        for (priority, ids) in &self.buckets {
            buf.push(priority.tag());
            buf.extend_from_slice(&(ids.len() as u64).to_le_bytes());
            for &id in ids {
                buf.extend_from_slice(&id.to_le_bytes());
            }
        }
        buf
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let (&bucket_count, mut rest) = data.split_first()?;
        let mut buckets = BTreeMap::new();

        for _ in 0..bucket_count {
            let (&tag, tail) = rest.split_first()?;
            let priority = Priority::from_tag(tag)?;
            if tail.len() < 8 {
                return None;
            }
            let count = u64::from_le_bytes(tail[0..8].try_into().ok()?) as usize;
            let body = &tail[8..];
            let expected = count.checked_mul(8)?;
            if body.len() < expected {
                return None;
            }
            let ids = body[..expected]
                .chunks_exact(8)
                .map(|chunk| chunk.try_into().map(u64::from_le_bytes))
                .collect::<Result<Vec<u64>, _>>()
                .ok()?;
            buckets.insert(priority, ids);
            rest = &body[expected..];
        }

        Some(Self { buckets })
    }
}

impl Default for PriorityIndex {
    fn default() -> Self {
        Self::new()
    }
}
