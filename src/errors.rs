use std::{io, path::PathBuf};

/// Shared error type used by the triage core and the command crates.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// File system I/O failure.
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),

    /// A path is invalid for the current operation.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The storage capability is unavailable in this environment.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    /// Enumeration of the selected directory yielded no files.
    #[error("no files found in the selected folder")]
    EmptyCatalog,

    /// Enumerating the selected directory failed outright.
    #[error("failed to enumerate {0}")]
    Enumeration(PathBuf, #[source] io::Error),

    /// The trash container could not be created or reused. Aborts the whole
    /// commit before any per-file relocation is attempted.
    #[error("failed to prepare trash container at {0}")]
    TrashContainer(PathBuf, #[source] io::Error),

    /// A conflict prevented the operation from proceeding.
    #[error("resource conflict: {0}")]
    Conflict(String),

    /// A session operation was invoked in the wrong lifecycle state.
    #[error("operation '{action}' is not valid in the {state} state")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl CoreError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedEnvironment(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }

    pub fn enumeration(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Enumeration(path.into(), error)
    }

    pub fn trash_container(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::TrashContainer(path.into(), error)
    }

    pub fn invalid_transition(state: &'static str, action: &'static str) -> Self {
        Self::InvalidTransition { state, action }
    }

    /// True for failures that poison an entire commit attempt, as opposed to
    /// per-file relocation failures accumulated in a `CommitResult`.
    pub fn is_systemic(&self) -> bool {
        matches!(self, Self::TrashContainer(_, _))
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
