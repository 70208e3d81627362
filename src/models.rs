use crate::errors::CoreError;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Opaque reference to a file's bytes, owned by the storage provider.
///
/// The triage core only forwards this value back to the provider; it never
/// reads or compares the underlying location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef(PathBuf);

impl ContentRef {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub(crate) fn as_path(&self) -> &Path {
        &self.0
    }
}

/// One triage-able file, snapshotted at catalog-build time.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name, unique within one catalog (case-sensitive).
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME-ish media type guessed by the provider, e.g. `image/png`.
    pub media_type: String,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    content: ContentRef,
}

impl FileEntry {
    pub(crate) fn new(
        name: impl Into<String>,
        size: u64,
        media_type: impl Into<String>,
        modified: DateTime<Utc>,
        content: ContentRef,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            media_type: media_type.into(),
            modified,
            content,
        }
    }

    pub(crate) fn content(&self) -> &ContentRef {
        &self.content
    }
}

/// The binary triage decision applied to each catalog entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Decision {
    Keep,
    Delete,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered, immutable snapshot of the files in a selected directory.
///
/// Order is the provider's enumeration order; stable for the session but
/// not guaranteed sorted.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<FileEntry>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate names.
    pub fn from_entries(entries: Vec<FileEntry>) -> crate::Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(CoreError::conflict(format!(
                    "duplicate catalog entry: {}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }
}

/// One undoable triage event, capturing enough state to exactly reverse it.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub prior_cursor: usize,
    pub decision: Decision,
    pub entry: FileEntry,
}

/// Per-file relocation failure, isolated from the rest of the batch.
#[derive(Debug, Clone)]
pub struct RelocationFailure {
    pub name: String,
    pub cause: String,
}

/// Partitioned outcome of one commit attempt.
///
/// `relocated.len() + failed.len()` always equals the size of the delete set
/// the commit was invoked with. `residues` lists names whose trash copy
/// succeeded but whose original could not be removed afterwards; those names
/// are still counted in `relocated`, so a duplicate now exists in both
/// places.
#[derive(Debug, Clone, Default)]
pub struct CommitResult {
    pub relocated: Vec<String>,
    pub failed: Vec<RelocationFailure>,
    pub residues: Vec<String>,
}

impl CommitResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when every entry relocated cleanly, with no residues left behind.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.residues.is_empty()
    }

    /// Total number of entries accounted for by this result.
    pub fn total(&self) -> usize {
        self.relocated.len() + self.failed.len()
    }
}

/// Derived snapshot of triage progress for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriageStats {
    pub total: usize,
    pub position: usize,
    pub deleted: usize,
    pub kept: usize,
    /// Bytes that would be freed by committing the current delete set.
    pub bytes_to_free: u64,
}
