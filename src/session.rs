use crate::commit::CommitEngine;
use crate::errors::CoreError;
use crate::models::{Catalog, CommitResult, Decision, FileEntry, TriageStats};
use crate::storage::StorageProvider;
use crate::triage::TriageSession;
use tracing::info;

/// Lifecycle phase of one triage session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SessionState {
    Idle,
    Triaging,
    Reviewing,
    Committing,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Triaging => "triaging",
            Self::Reviewing => "reviewing",
            Self::Committing => "committing",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

struct ActiveSession<R> {
    root: R,
    triage: TriageSession,
}

/// Orchestrates the load → triage → review → commit → reset lifecycle on
/// top of a storage provider.
///
/// All decision and relocation semantics live in `TriageSession` and
/// `CommitEngine`; this controller only enforces which operation is legal in
/// which phase.
pub struct SessionController<S: StorageProvider> {
    storage: S,
    state: SessionState,
    active: Option<ActiveSession<S::Root>>,
}

impl<S: StorageProvider> SessionController<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: SessionState::Idle,
            active: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The live triage session, when one is loaded.
    pub fn session(&self) -> Option<&TriageSession> {
        self.active.as_ref().map(|active| &active.triage)
    }

    pub fn stats(&self) -> Option<TriageStats> {
        self.session().map(TriageSession::stats)
    }

    pub fn current(&self) -> Option<&FileEntry> {
        self.session().and_then(TriageSession::current)
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> crate::Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CoreError::invalid_transition(self.state.as_str(), action))
        }
    }

    /// Resolves a root via the provider and loads its catalog.
    ///
    /// Returns `Ok(false)` when the user cancelled the selection. A folder
    /// with zero files is a load failure (`EmptyCatalog`), never an empty
    /// triaging session; in every failure case the controller stays Idle.
    pub fn select_folder(&mut self) -> crate::Result<bool> {
        self.expect_state(SessionState::Idle, "select folder")?;

        let Some(root) = self.storage.select_root()? else {
            return Ok(false);
        };
        let entries = self.storage.list_entries(&root)?;
        if entries.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        let catalog = Catalog::from_entries(entries)?;
        info!(files = catalog.len(), "catalog loaded");

        self.active = Some(ActiveSession {
            root,
            triage: TriageSession::new(catalog),
        });
        self.state = SessionState::Triaging;
        Ok(true)
    }

    /// Records a Keep/Delete decision for the current entry.
    pub fn record_decision(&mut self, decision: Decision) -> crate::Result<()> {
        self.expect_state(SessionState::Triaging, "record decision")?;
        if let Some(active) = self.active.as_mut() {
            active.triage.record_decision(decision);
        }
        Ok(())
    }

    /// Reverses the most recent decision.
    pub fn undo(&mut self) -> crate::Result<()> {
        self.expect_state(SessionState::Triaging, "undo")?;
        if let Some(active) = self.active.as_mut() {
            active.triage.undo();
        }
        Ok(())
    }

    /// Moves to the review phase. Valid at any point during triage, so the
    /// user can finish early.
    pub fn finish(&mut self) -> crate::Result<()> {
        self.expect_state(SessionState::Triaging, "finish")?;
        self.state = SessionState::Reviewing;
        Ok(())
    }

    /// Returns from review to triage with all decisions preserved.
    pub fn resume_triage(&mut self) -> crate::Result<()> {
        self.expect_state(SessionState::Reviewing, "resume triage")?;
        self.state = SessionState::Triaging;
        Ok(())
    }

    /// Executes the batch relocation for the reviewed delete set.
    ///
    /// On success the session is over and the controller returns to Idle,
    /// whatever the per-file outcome was. A systemic failure propagates and
    /// leaves the controller in Reviewing with the session untouched, so the
    /// caller can surface it and let the user retry.
    pub fn confirm_commit(&mut self) -> crate::Result<CommitResult> {
        self.expect_state(SessionState::Reviewing, "confirm commit")?;
        let Some(active) = self.active.as_ref() else {
            return Err(CoreError::invalid_transition(self.state.as_str(), "confirm commit"));
        };

        self.state = SessionState::Committing;
        let engine = CommitEngine::new(&self.storage);
        match engine.commit(&active.root, active.triage.delete_set()) {
            Ok(result) => {
                self.state = SessionState::Idle;
                self.active = None;
                Ok(result)
            }
            Err(err) => {
                self.state = SessionState::Reviewing;
                Err(err)
            }
        }
    }

    /// Abandons the current session and returns to Idle. Safe in any state.
    pub fn start_over(&mut self) {
        self.state = SessionState::Idle;
        self.active = None;
    }
}
