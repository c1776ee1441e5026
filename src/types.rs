use crate::backend::SearchBackend;
use serde::Serialize;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A single project file whose incoming references are searched.
///
/// Two targets are the same target when their paths match; the identifier
/// is the token handed to the external tool (e.g. an asset GUID).
#[derive(Debug, Clone, Serialize)]
pub struct SearchTarget {
    pub identifier: String,
    /// Forward-slash, project-relative path (e.g. `Assets/A.png`)
    pub path: String,
}

impl SearchTarget {
    pub fn new(identifier: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
        }
    }

    /// Final path component, used for progress labels
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl PartialEq for SearchTarget {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for SearchTarget {}

impl Hash for SearchTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for SearchTarget {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchTarget {
    // Ordinal comparison keeps the order identical to the project browser
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.as_bytes().cmp(other.path.as_bytes())
    }
}

/// Handle to a loaded project entity, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityHandle {
    pub path: String,
    pub display_name: String,
}

/// One file that references a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub path: String,
    /// `None` when the referencing file no longer resolves (missing/deleted)
    pub entity: Option<EntityHandle>,
}

impl ReferenceEntry {
    pub fn is_missing(&self) -> bool {
        self.entity.is_none()
    }
}

/// Search state of a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "entries", rename_all = "snake_case")]
pub enum References {
    /// The target has not been searched yet
    NotSearched,
    /// Searched, nothing references the target
    Empty,
    /// Searched, at least one reference was found
    Found(Vec<ReferenceEntry>),
}

impl References {
    pub fn entries(&self) -> &[ReferenceEntry] {
        match self {
            References::Found(entries) => entries,
            References::NotSearched | References::Empty => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// References found for one target.
#[derive(Debug, Clone, Serialize)]
pub struct AssetReferenceRecord {
    pub target: SearchTarget,
    pub entity: Option<EntityHandle>,
    references: References,
    /// Presentation-only expand/collapse flag
    pub is_expanded: bool,
}

impl AssetReferenceRecord {
    pub fn new(target: SearchTarget, entity: Option<EntityHandle>) -> Self {
        Self {
            target,
            entity,
            references: References::NotSearched,
            is_expanded: false,
        }
    }

    pub fn references(&self) -> &References {
        &self.references
    }

    /// Append a reference. The record moves to `Found` and stays there.
    pub fn add_reference(&mut self, entry: ReferenceEntry) {
        match &mut self.references {
            References::Found(entries) => entries.push(entry),
            state => *state = References::Found(vec![entry]),
        }
    }

    /// Mark the search for this target as finished.
    ///
    /// A record that received no references becomes `Empty`; `Found` is kept.
    pub fn finish(&mut self) {
        if self.references == References::NotSearched {
            self.references = References::Empty;
        }
    }

    pub fn toggle_expanded(&mut self) {
        self.is_expanded = !self.is_expanded;
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCompletion {
    Completed,
    /// Stopped at a target boundary; `assets` holds what was aggregated so far
    Cancelled,
}

/// Aggregated references for every searched target, in target order.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub backend: SearchBackend,
    pub completion: SearchCompletion,
    assets: Vec<AssetReferenceRecord>,
}

impl SearchResult {
    pub(crate) fn new(backend: SearchBackend) -> Self {
        Self {
            backend,
            completion: SearchCompletion::Completed,
            assets: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: AssetReferenceRecord) {
        self.assets.push(record);
    }

    pub fn assets(&self) -> &[AssetReferenceRecord] {
        &self.assets
    }

    /// Mutable access limited to the expand/collapse flag
    pub fn set_expanded(&mut self, index: usize, expanded: bool) -> bool {
        match self.assets.get_mut(index) {
            Some(record) => {
                record.is_expanded = expanded;
                true
            }
            None => false,
        }
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        for record in &mut self.assets {
            record.is_expanded = expanded;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.completion == SearchCompletion::Cancelled
    }

    pub fn find(&self, path: &str) -> Option<&AssetReferenceRecord> {
        self.assets.iter().find(|record| record.target.path == path)
    }

    pub fn total_references(&self) -> usize {
        self.assets.iter().map(|record| record.references().len()).sum()
    }
}
