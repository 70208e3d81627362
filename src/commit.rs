use crate::models::{CommitResult, FileEntry, RelocationFailure};
use crate::storage::StorageProvider;
use tracing::{debug, info, warn};

/// Executes the batch relocation protocol for a finished triage session.
///
/// Individual file failures never raise; they are accumulated into the
/// returned `CommitResult`. Only a systemic failure (the trash container
/// cannot be prepared) aborts the attempt, and it does so before any
/// per-file operation starts.
pub struct CommitEngine<'a, S: StorageProvider> {
    storage: &'a S,
}

impl<'a, S: StorageProvider> CommitEngine<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Relocates every entry of `delete_set` into the trash container,
    /// sequentially and in the given order.
    ///
    /// Per entry: copy into the container first, remove the original only
    /// after the copy succeeded. A failed copy leaves the original untouched
    /// and lands the entry in `failed`. A failed removal after a successful
    /// copy still counts the entry as `relocated` but records it in
    /// `residues`, since the original now coexists with its trash copy.
    pub fn commit(&self, root: &S::Root, delete_set: &[FileEntry]) -> crate::Result<CommitResult> {
        if delete_set.is_empty() {
            return Ok(CommitResult::empty());
        }

        let container = self.storage.ensure_trash_container(root)?;

        let mut result = CommitResult::empty();
        for entry in delete_set {
            match self.storage.write_copy(&container, entry) {
                Ok(()) => {
                    match self.storage.remove_original(root, entry) {
                        Ok(()) => debug!(name = %entry.name, "relocated to trash"),
                        Err(err) => {
                            warn!(
                                name = %entry.name,
                                error = %err,
                                "trash copy written but original could not be removed"
                            );
                            result.residues.push(entry.name.clone());
                        }
                    }
                    result.relocated.push(entry.name.clone());
                }
                Err(err) => {
                    warn!(name = %entry.name, error = %err, "copy into trash failed; original left in place");
                    result.failed.push(RelocationFailure {
                        name: entry.name.clone(),
                        cause: err.to_string(),
                    });
                }
            }
        }

        info!(
            relocated = result.relocated.len(),
            failed = result.failed.len(),
            residues = result.residues.len(),
            "commit finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreError;
    use crate::models::ContentRef;
    use chrono::DateTime;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::io;
    use std::path::PathBuf;

    /// Scripted provider that records every call and fails on demand.
    #[derive(Default)]
    struct ScriptedStorage {
        calls: RefCell<Vec<String>>,
        fail_container: bool,
        fail_copy_for: HashSet<String>,
        fail_remove_for: HashSet<String>,
    }

    impl ScriptedStorage {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn log(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl StorageProvider for ScriptedStorage {
        type Root = ();
        type Container = ();

        fn select_root(&self) -> crate::Result<Option<()>> {
            Ok(Some(()))
        }

        fn list_entries(&self, _root: &()) -> crate::Result<Vec<FileEntry>> {
            Ok(Vec::new())
        }

        fn read_preview(&self, _entry: &FileEntry) -> crate::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn ensure_trash_container(&self, _root: &()) -> crate::Result<()> {
            self.log("ensure".to_string());
            if self.fail_container {
                return Err(CoreError::trash_container(
                    PathBuf::from("/root/_Scrubbed_Trash"),
                    io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                ));
            }
            Ok(())
        }

        fn write_copy(&self, _container: &(), entry: &FileEntry) -> crate::Result<()> {
            self.log(format!("copy {}", entry.name));
            if self.fail_copy_for.contains(&entry.name) {
                return Err(CoreError::io(
                    format!("/trash/{}", entry.name),
                    io::Error::new(io::ErrorKind::Other, "disk full"),
                ));
            }
            Ok(())
        }

        fn remove_original(&self, _root: &(), entry: &FileEntry) -> crate::Result<()> {
            self.log(format!("remove {}", entry.name));
            if self.fail_remove_for.contains(&entry.name) {
                return Err(CoreError::io(
                    format!("/root/{}", entry.name),
                    io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
                ));
            }
            Ok(())
        }
    }

    fn entry(name: &str, size: u64) -> FileEntry {
        FileEntry::new(
            name,
            size,
            "application/octet-stream",
            DateTime::UNIX_EPOCH,
            ContentRef::new(format!("/root/{name}")),
        )
    }

    #[test]
    fn empty_delete_set_makes_no_provider_calls() {
        let storage = ScriptedStorage::default();
        let result = CommitEngine::new(&storage).commit(&(), &[]).unwrap();

        assert!(result.relocated.is_empty());
        assert!(result.failed.is_empty());
        assert!(storage.calls().is_empty());
    }

    #[test]
    fn relocates_every_entry_in_order() {
        let storage = ScriptedStorage::default();
        let set = [entry("a.txt", 1), entry("b.txt", 2)];
        let result = CommitEngine::new(&storage).commit(&(), &set).unwrap();

        assert_eq!(result.relocated, ["a.txt", "b.txt"]);
        assert!(result.is_clean());
        assert_eq!(
            storage.calls(),
            ["ensure", "copy a.txt", "remove a.txt", "copy b.txt", "remove b.txt"]
        );
    }

    #[test]
    fn copy_failure_skips_removal_and_isolates_the_entry() {
        let storage = ScriptedStorage {
            fail_copy_for: HashSet::from(["b.txt".to_string()]),
            ..Default::default()
        };
        let set = [entry("a.txt", 1), entry("b.txt", 2), entry("c.txt", 3)];
        let result = CommitEngine::new(&storage).commit(&(), &set).unwrap();

        assert_eq!(result.relocated, ["a.txt", "c.txt"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].name, "b.txt");
        assert_eq!(result.total(), set.len());
        // The failed entry must never have its original removed.
        assert!(!storage.calls().contains(&"remove b.txt".to_string()));
    }

    #[test]
    fn container_failure_aborts_before_any_per_file_work() {
        let storage = ScriptedStorage {
            fail_container: true,
            ..Default::default()
        };
        let set = [entry("a.txt", 1), entry("b.txt", 2)];
        let err = CommitEngine::new(&storage).commit(&(), &set).unwrap_err();

        assert!(err.is_systemic());
        assert_eq!(storage.calls(), ["ensure"]);
    }

    #[test]
    fn removal_failure_counts_as_relocated_but_leaves_a_residue() {
        let storage = ScriptedStorage {
            fail_remove_for: HashSet::from(["a.txt".to_string()]),
            ..Default::default()
        };
        let set = [entry("a.txt", 1), entry("b.txt", 2)];
        let result = CommitEngine::new(&storage).commit(&(), &set).unwrap();

        assert_eq!(result.relocated, ["a.txt", "b.txt"]);
        assert!(result.failed.is_empty());
        assert_eq!(result.residues, ["a.txt"]);
        assert!(!result.is_clean());
    }

    #[test]
    fn delete_keep_delete_scenario_accounts_for_every_entry() {
        // Catalog [a(100), b(200), c(300)]; decisions delete/keep/delete;
        // commit succeeds for a, fails for c.
        let storage = ScriptedStorage {
            fail_copy_for: HashSet::from(["c.bin".to_string()]),
            ..Default::default()
        };
        let delete_set = [entry("a.bin", 100), entry("c.bin", 300)];
        let result = CommitEngine::new(&storage).commit(&(), &delete_set).unwrap();

        assert_eq!(result.relocated, ["a.bin"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].name, "c.bin");
        assert_eq!(result.total(), 2);
    }
}
