use crate::helpers::total_size;
use crate::models::{Catalog, Decision, FileEntry, HistoryRecord, TriageStats};
use tracing::trace;

/// Single-pass, strictly-ordered traversal of a catalog with one open
/// decision per entry and chainable undo.
///
/// Decisions are modeled as an append-only event log rather than mutable
/// per-entry flags, so undo is the exact inverse of the last event and the
/// cursor can never disagree with the recorded history.
#[derive(Debug)]
pub struct TriageSession {
    catalog: Catalog,
    cursor: usize,
    delete_set: Vec<FileEntry>,
    keep_set: Vec<FileEntry>,
    history: Vec<HistoryRecord>,
}

impl TriageSession {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cursor: 0,
            delete_set: Vec::new(),
            keep_set: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Records a decision for the entry under the cursor and advances past
    /// it, as one atomic transition. Silently ignored once the traversal is
    /// complete; callers gate their controls, but rapid repeated input must
    /// stay safe here regardless.
    pub fn record_decision(&mut self, decision: Decision) {
        let Some(entry) = self.catalog.get(self.cursor) else {
            return;
        };
        let entry = entry.clone();
        trace!(name = %entry.name, %decision, cursor = self.cursor, "decision recorded");

        self.history.push(HistoryRecord {
            prior_cursor: self.cursor,
            decision,
            entry: entry.clone(),
        });
        match decision {
            Decision::Delete => self.delete_set.push(entry),
            Decision::Keep => self.keep_set.push(entry),
        }
        self.cursor += 1;
    }

    /// Reverses the most recent decision and moves the cursor back to it.
    /// Chainable arbitrarily far; a no-op on empty history. There is no
    /// redo.
    pub fn undo(&mut self) {
        let Some(record) = self.history.pop() else {
            return;
        };
        trace!(name = %record.entry.name, cursor = record.prior_cursor, "decision undone");
        match record.decision {
            Decision::Delete => {
                self.delete_set.pop();
            }
            Decision::Keep => {
                self.keep_set.pop();
            }
        }
        self.cursor = record.prior_cursor;
    }

    /// True once every catalog entry has a recorded decision.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.catalog.len()
    }

    /// Clears all decisions and rewinds to the first entry. The catalog
    /// itself is untouched.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.delete_set.clear();
        self.keep_set.clear();
        self.history.clear();
    }

    /// The entry currently awaiting a decision.
    pub fn current(&self) -> Option<&FileEntry> {
        self.catalog.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn delete_set(&self) -> &[FileEntry] {
        &self.delete_set
    }

    pub fn keep_set(&self) -> &[FileEntry] {
        &self.keep_set
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn stats(&self) -> TriageStats {
        TriageStats {
            total: self.catalog.len(),
            position: self.cursor,
            deleted: self.delete_set.len(),
            kept: self.keep_set.len(),
            bytes_to_free: total_size(&self.delete_set),
        }
    }
}
