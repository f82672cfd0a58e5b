//! Persistent document store with priority and keyword indexes.
//!
//! Every mutation is applied in memory, written through to the `.rcad`
//! file, and rolled back if the write fails, so a failed call leaves the
//! store exactly as it was.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::format::{StoreReader, StoreSnapshot, StoreWriter, FORMAT_VERSION};
use crate::index::{KeywordIndex, PriorityIndex};
use crate::types::{Document, NewDocument, Priority, TriageError, TriageResult};

/// First id handed out by a fresh store.
const FIRST_ID: u64 = 1;

enum Backing {
    File(PathBuf),
    Memory,
}

/// Keyed collection of documents.
///
/// Ids come from a monotonically increasing counter that is persisted with
/// the data, so an id is never reused after its document is deleted.
pub struct DocumentStore {
    backing: Backing,
    documents: BTreeMap<u64, Document>,
    next_id: u64,
    priority_index: PriorityIndex,
    keyword_index: KeywordIndex,
}

impl DocumentStore {
    /// Open (or create) the store file at `path`.
    ///
    /// The indexes are created when the file does not exist yet, or
    /// rebuilt when an older file lacks them. Any failure is reported as
    /// [`TriageError::StorageInitFailed`].
    pub fn open(path: impl AsRef<Path>) -> TriageResult<Self> {
        let path = path.as_ref().to_path_buf();
        Self::open_inner(path).map_err(|e| match e {
            TriageError::StorageInitFailed(_) => e,
            other => TriageError::StorageInitFailed(other.to_string()),
        })
    }

    fn open_inner(path: PathBuf) -> TriageResult<Self> {
        if !path.exists() {
            let store = Self::empty(Backing::File(path));
            store.persist()?;
            log::info!("created document store and indexes at {}", store.describe());
            return Ok(store);
        }

        let image = StoreReader::read_from_file(&path)?;
        let mut upgraded = image.header.version < FORMAT_VERSION;

        let documents: BTreeMap<u64, Document> =
            image.documents.into_iter().map(|d| (d.id, d)).collect();

        let max_id = documents.keys().next_back().copied().unwrap_or(0);
        let next_id = image.header.next_id.max(max_id.saturating_add(1)).max(FIRST_ID);

        let priority_index = match image.priority_index {
            Some(index) => index,
            None => {
                log::info!("rebuilding priority index for {}", path.display());
                upgraded = true;
                PriorityIndex::build(documents.values())
            }
        };
        let keyword_index = match image.keyword_index {
            Some(index) => index,
            None => {
                log::info!("rebuilding keyword index for {}", path.display());
                upgraded = true;
                KeywordIndex::build(documents.values())
            }
        };

        let store = Self {
            backing: Backing::File(path),
            documents,
            next_id,
            priority_index,
            keyword_index,
        };

        if upgraded {
            store.persist()?;
            log::info!(
                "upgraded document store {} to format version {}",
                store.describe(),
                FORMAT_VERSION
            );
        }

        log::info!(
            "opened document store {} ({} documents)",
            store.describe(),
            store.len()
        );
        Ok(store)
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::empty(Backing::Memory)
    }

    fn empty(backing: Backing) -> Self {
        Self {
            backing,
            documents: BTreeMap::new(),
            next_id: FIRST_ID,
            priority_index: PriorityIndex::new(),
            keyword_index: KeywordIndex::new(),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory => None,
        }
    }

    fn describe(&self) -> String {
        match &self.backing {
            Backing::File(path) => path.display().to_string(),
            Backing::Memory => "<memory>".to_string(),
        }
    }

    /// Insert a new document and return its id.
    pub fn add(&mut self, document: NewDocument) -> TriageResult<u64> {
        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| TriageError::storage("add", "id space exhausted"))?;
        let document = document.with_id(id);

        self.next_id = next_id;
        self.index(&document);
        self.documents.insert(id, document);

        if let Err(e) = self.persist() {
            if let Some(document) = self.documents.remove(&id) {
                self.unindex(&document);
            }
            self.next_id = id;
            return Err(e);
        }

        log::debug!("added document {id}");
        Ok(id)
    }

    /// Replace the document with the same id.
    ///
    /// A missing id is inserted as-is (upsert), and the id counter moves
    /// past it.
    pub fn update(&mut self, document: Document) -> TriageResult<()> {
        let id = document.id;
        let previous_next_id = self.next_id;

        let previous = self.documents.remove(&id);
        if let Some(old) = &previous {
            self.unindex(old);
        }
        self.index(&document);
        self.documents.insert(id, document);
        self.next_id = self.next_id.max(id.saturating_add(1));

        if let Err(e) = self.persist() {
            if let Some(current) = self.documents.remove(&id) {
                self.unindex(&current);
            }
            if let Some(old) = previous {
                self.index(&old);
                self.documents.insert(id, old);
            }
            self.next_id = previous_next_id;
            return Err(e);
        }

        match previous {
            Some(_) => log::debug!("updated document {id}"),
            None => log::debug!("update inserted missing document {id}"),
        }
        Ok(())
    }

    /// Remove a document. Removing an unknown id succeeds.
    pub fn delete(&mut self, id: u64) -> TriageResult<()> {
        let Some(document) = self.documents.remove(&id) else {
            log::debug!("delete of unknown document {id} ignored");
            return Ok(());
        };
        self.unindex(&document);

        if let Err(e) = self.persist() {
            self.index(&document);
            self.documents.insert(id, document);
            return Err(e);
        }

        log::debug!("deleted document {id}");
        Ok(())
    }

    /// Every stored document, ascending by id.
    pub fn list_all(&self) -> Vec<Document> {
        self.documents.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Documents in a tier, via the priority index.
    pub fn find_by_priority(&self, priority: Priority) -> Vec<&Document> {
        self.priority_index
            .get(priority)
            .iter()
            .filter_map(|id| self.documents.get(id))
            .collect()
    }

    /// Documents carrying a keyword, via the keyword index.
    pub fn find_by_keyword(&self, keyword: &str) -> Vec<&Document> {
        self.keyword_index
            .get(keyword)
            .iter()
            .filter_map(|id| self.documents.get(id))
            .collect()
    }

    pub fn priority_index(&self) -> &PriorityIndex {
        &self.priority_index
    }

    pub fn keyword_index(&self) -> &KeywordIndex {
        &self.keyword_index
    }

    /// Id the next `add` will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn index(&mut self, document: &Document) {
        self.priority_index.add_document(document);
        self.keyword_index.add_document(document);
    }

    fn unindex(&mut self, document: &Document) {
        self.priority_index.remove_document(document);
        self.keyword_index.remove_document(document);
    }

    fn persist(&self) -> TriageResult<()> {
        let Backing::File(path) = &self.backing else {
            return Ok(());
        };
        let snapshot = StoreSnapshot {
            next_id: self.next_id,
            documents: self.documents.values().collect(),
            priority_index: Some(&self.priority_index),
            keyword_index: Some(&self.keyword_index),
        };
        StoreWriter::new().write_to_file(&snapshot, path)
    }
}
