//! In-memory document cache with filtering and name sorting.
//!
//! The cache mirrors the whole store and is rebuilt in full by
//! [`DocumentRepository::refresh`]. Filters and sorting only ever touch the
//! cache.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::store::DocumentStore;
use crate::types::{Document, Priority, TriageError, TriageResult};

/// Priority half of the filter: a wildcard or a single tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => *p == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = TriageError;

    fn from_str(s: &str) -> TriageResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Priority::from_name(s)
            .map(Self::Only)
            .ok_or_else(|| TriageError::InvalidFilter(format!("unknown priority filter '{s}'")))
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(p) => write!(f, "{p}"),
        }
    }
}

/// Both active filters. A document must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub priority: PriorityFilter,
    /// Exact keyword to require; `None` disables the keyword filter.
    pub keyword: Option<String>,
}

impl DocumentFilter {
    /// An empty keyword string means "no keyword filter".
    pub fn new(priority: PriorityFilter, keyword: &str) -> Self {
        Self {
            priority,
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.priority.matches(document.priority)
            && self
                .keyword
                .as_deref()
                .map_or(true, |keyword| document.has_keyword(keyword))
    }

    pub fn is_active(&self) -> bool {
        self.priority != PriorityFilter::All || self.keyword.is_some()
    }
}

/// Direction of the name sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Cached view over every stored document.
#[derive(Default)]
pub struct DocumentRepository {
    cache: Vec<Document>,
    keywords: Vec<String>,
    filter: DocumentFilter,
    sort: Option<SortOrder>,
}

impl DocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the cache from the store.
    ///
    /// Rebuilds the distinct keyword list and re-applies the active name
    /// sort, if any. Returns the number of cached documents.
    pub fn refresh(&mut self, store: &DocumentStore) -> usize {
        self.load(store.list_all());
        log::debug!(
            "repository refreshed: {} documents, {} keywords",
            self.cache.len(),
            self.keywords.len()
        );
        self.cache.len()
    }

    /// Replace the cache with the given documents.
    pub fn load(&mut self, documents: Vec<Document>) {
        self.cache = documents;
        self.keywords = self
            .cache
            .iter()
            .flat_map(|doc| doc.keywords.iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        if let Some(order) = self.sort {
            self.sort_cache(order);
        }
    }

    /// Set both filters and return the matching documents.
    pub fn apply_filters(&mut self, priority: PriorityFilter, keyword: &str) -> Vec<&Document> {
        self.filter = DocumentFilter::new(priority, keyword);
        self.view()
    }

    pub fn set_filter(&mut self, filter: DocumentFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> &DocumentFilter {
        &self.filter
    }

    /// Back to all priorities and no keyword.
    pub fn reset_filters(&mut self) {
        self.filter = DocumentFilter::default();
    }

    /// Cached documents passing the active filters, in cache order.
    pub fn view(&self) -> Vec<&Document> {
        self.cache
            .iter()
            .filter(|doc| self.filter.matches(doc))
            .collect()
    }

    /// Sort the cache by name, case-insensitive. Ties keep their order.
    pub fn sort_by_name(&mut self, ascending: bool) {
        let order = if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        };
        self.sort = Some(order);
        self.sort_cache(order);
    }

    /// Flip the name sort. The direction starts out ascending, so the first
    /// toggle sorts descending.
    pub fn toggle_name_sort(&mut self) -> SortOrder {
        let order = self.sort.unwrap_or(SortOrder::Ascending).reversed();
        self.sort_by_name(order == SortOrder::Ascending);
        order
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort
    }

    fn sort_cache(&mut self, order: SortOrder) {
        self.cache.sort_by(|a, b| {
            let ord = compare_names(&a.name, &b.name);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }

    /// Distinct keywords across the cache, sorted.
    pub fn available_keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Every cached document, unfiltered.
    pub fn documents(&self) -> &[Document] {
        &self.cache
    }

    pub fn get(&self, id: u64) -> Option<&Document> {
        self.cache.iter().find(|doc| doc.id == id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
