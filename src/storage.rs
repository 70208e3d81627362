use crate::errors::CoreError;
use crate::helpers::{guess_media_type, media_kind, MediaKind};
use crate::models::{ContentRef, FileEntry};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the relocation target folder, created directly under the
/// selected root.
pub const TRASH_FOLDER_NAME: &str = "_Scrubbed_Trash";

/// Storage capability boundary consumed by the triage core.
///
/// Keeping this trait narrow makes it easy to write deterministic tests and
/// allows alternative backends without touching the decision or commit
/// logic.
pub trait StorageProvider {
    /// Handle to a selected root directory.
    type Root;
    /// Handle to the trash container under a root.
    type Container;

    /// Resolves the root to triage. `Ok(None)` means the user cancelled the
    /// selection; that is not an error.
    fn select_root(&self) -> crate::Result<Option<Self::Root>>;

    /// Enumerates the files directly under the root, in provider order.
    /// Non-recursive; directories are not included.
    fn list_entries(&self, root: &Self::Root) -> crate::Result<Vec<FileEntry>>;

    /// Reads preview bytes for previewable media types, `None` otherwise.
    fn read_preview(&self, entry: &FileEntry) -> crate::Result<Option<Vec<u8>>>;

    /// Creates the trash container if absent, reuses it if present.
    fn ensure_trash_container(&self, root: &Self::Root) -> crate::Result<Self::Container>;

    /// Writes a byte-identical copy of the entry into the container under
    /// the entry's original name, overwriting any previous occupant.
    fn write_copy(&self, container: &Self::Container, entry: &FileEntry) -> crate::Result<()>;

    /// Removes the original entry from its source location.
    fn remove_original(&self, root: &Self::Root, entry: &FileEntry) -> crate::Result<()>;
}

/// Default provider backed by `std::fs`.
///
/// A command-line process has no picker dialog, so root selection validates
/// a pre-configured path instead: an unconfigured provider reports the
/// selection as cancelled.
#[derive(Debug, Default, Clone)]
pub struct DirectoryStorage {
    configured: Option<PathBuf>,
}

impl DirectoryStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            configured: Some(path.into()),
        }
    }

    pub fn unselected() -> Self {
        Self { configured: None }
    }
}

impl StorageProvider for DirectoryStorage {
    type Root = PathBuf;
    type Container = PathBuf;

    fn select_root(&self) -> crate::Result<Option<PathBuf>> {
        let Some(path) = &self.configured else {
            return Ok(None);
        };
        let metadata = fs::metadata(path).map_err(|err| CoreError::io(path, err))?;
        if !metadata.is_dir() {
            return Err(CoreError::invalid_path(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        Ok(Some(path.clone()))
    }

    fn list_entries(&self, root: &PathBuf) -> crate::Result<Vec<FileEntry>> {
        let mut entries = Vec::new();
        let dir = fs::read_dir(root).map_err(|err| CoreError::enumeration(root, err))?;
        for dir_entry in dir {
            let dir_entry = dir_entry.map_err(|err| CoreError::enumeration(root, err))?;
            let metadata = dir_entry
                .metadata()
                .map_err(|err| CoreError::enumeration(root, err))?;
            if !metadata.is_file() {
                continue;
            }

            let name = dir_entry.file_name().to_string_lossy().into_owned();
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::UNIX_EPOCH);
            let media_type = guess_media_type(&name);
            entries.push(FileEntry::new(
                name,
                metadata.len(),
                media_type,
                modified,
                ContentRef::new(dir_entry.path()),
            ));
        }
        Ok(entries)
    }

    fn read_preview(&self, entry: &FileEntry) -> crate::Result<Option<Vec<u8>>> {
        if media_kind(&entry.media_type, &entry.name) != MediaKind::Image {
            return Ok(None);
        }
        let path = entry.content().as_path();
        fs::read(path)
            .map(Some)
            .map_err(|err| CoreError::io(path, err))
    }

    fn ensure_trash_container(&self, root: &PathBuf) -> crate::Result<PathBuf> {
        let container = root.join(TRASH_FOLDER_NAME);
        fs::create_dir_all(&container)
            .map_err(|err| CoreError::trash_container(&container, err))?;
        Ok(container)
    }

    fn write_copy(&self, container: &PathBuf, entry: &FileEntry) -> crate::Result<()> {
        let target = container.join(&entry.name);
        // fs::copy truncates an existing target, which is exactly the
        // last-write-wins collision policy for names trashed in a prior
        // session.
        fs::copy(entry.content().as_path(), &target)
            .map(|_| ())
            .map_err(|err| CoreError::io(target, err))
    }

    fn remove_original(&self, root: &PathBuf, entry: &FileEntry) -> crate::Result<()> {
        let original = root.join(&entry.name);
        fs::remove_file(&original).map_err(|err| CoreError::io(original, err))
    }
}
