//! Core triage and trash-relocation engine for the Scrubbed folder cleaner.
//! This crate intentionally stays dependency-light and focuses on the
//! decision state machine and the batch relocation protocol; presentation
//! lives in the command crates built on top of it.

pub mod commit;
pub mod errors;
pub mod helpers;
pub mod models;
pub mod session;
pub mod storage;
pub mod triage;

pub use commit::CommitEngine;
pub use errors::{CoreError, Result};
pub use helpers::{
    format_modified,
    format_size,
    guess_media_type,
    media_kind,
    sanitize_user_path,
    total_size,
    MediaKind,
    MODIFIED_TIME_FORMAT,
};
pub use models::{
    Catalog,
    CommitResult,
    Decision,
    FileEntry,
    HistoryRecord,
    RelocationFailure,
    TriageStats,
};
pub use session::{SessionController, SessionState};
pub use storage::{DirectoryStorage, StorageProvider, TRASH_FOLDER_NAME};
pub use triage::TriageSession;

/// Re-export a small stable API surface for command crates.
pub mod prelude {
    pub use crate::{
        commit::CommitEngine,
        errors::{CoreError, Result},
        helpers::*,
        models::*,
        session::{SessionController, SessionState},
        storage::{DirectoryStorage, StorageProvider, TRASH_FOLDER_NAME},
        triage::TriageSession,
    };
}
