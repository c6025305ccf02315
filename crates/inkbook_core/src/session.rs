//! Notebook session lifecycle.
//!
//! # Responsibility
//! - Hold the open document, its backing path, and the dirty flag.
//! - Provide the new/open/save operations the shell menu drives.
//! - Enforce the unsaved-changes policy: cancel aborts, discard proceeds,
//!   save persists first.
//!
//! # Invariants
//! - A failed load never leaves partial state: the session resets to a fresh
//!   empty document and surfaces the error.
//! - `dirty` is cleared only by a successful save or a document swap.

use crate::model::document::NotebookDocument;
use crate::store::{self, StoreResult};
use log::info;
use std::path::{Path, PathBuf};

/// User answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// The open notebook and its persistence bookkeeping.
pub struct Session {
    document: NotebookDocument,
    path: Option<PathBuf>,
    dirty: bool,
}

impl Session {
    /// Starts with a fresh unsaved notebook.
    pub fn new() -> Self {
        Self {
            document: NotebookDocument::new(),
            path: None,
            dirty: false,
        }
    }

    pub fn document(&self) -> &NotebookDocument {
        &self.document
    }

    /// Mutable document access; marks the session dirty because every caller
    /// is about to change content.
    pub fn document_mut(&mut self) -> &mut NotebookDocument {
        self.dirty = true;
        self.document.touch();
        &mut self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a destructive action (new/open/exit) must prompt first.
    pub fn needs_save_prompt(&self) -> bool {
        self.dirty
    }

    /// Resolves the unsaved-changes prompt.
    ///
    /// Returns `Ok(true)` when the triggering action may proceed. `Cancel`
    /// always aborts with state untouched. `Save` persists first and also
    /// aborts when the session has no backing path yet (the shell must run
    /// save-as, then retry).
    pub fn resolve_unsaved(&mut self, choice: UnsavedChoice) -> StoreResult<bool> {
        match choice {
            UnsavedChoice::Cancel => Ok(false),
            UnsavedChoice::Discard => Ok(true),
            UnsavedChoice::Save => {
                if self.path.is_none() {
                    return Ok(false);
                }
                self.save()?;
                Ok(true)
            }
        }
    }

    /// Replaces the session with a fresh empty notebook.
    ///
    /// Callers are expected to have resolved the unsaved-changes prompt.
    pub fn new_document(&mut self) {
        self.document = NotebookDocument::new();
        self.path = None;
        self.dirty = false;
        info!("event=session_new module=session status=ok");
    }

    /// Loads a document from `path`, replacing the current one.
    ///
    /// On failure the session resets to a fresh empty notebook and the error
    /// is surfaced; no partial state is retained.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> StoreResult<()> {
        let path = path.into();
        match store::load(&path) {
            Ok(document) => {
                self.document = document;
                self.path = Some(path);
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.new_document();
                Err(err)
            }
        }
    }

    /// Saves to the session's backing path.
    ///
    /// Returns `Ok(false)` when there is no path yet; the shell should run a
    /// save-as dialog and call [`Session::save_as`].
    pub fn save(&mut self) -> StoreResult<bool> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        store::save(&mut self.document, &path)?;
        self.dirty = false;
        Ok(true)
    }

    /// Saves to `path` and adopts it as the session's backing path.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> StoreResult<()> {
        let path = path.into();
        store::save(&mut self.document, &path)?;
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, UnsavedChoice};

    #[test]
    fn mutation_marks_dirty_and_save_needs_a_path_first() {
        let mut session = Session::new();
        assert!(!session.is_dirty());

        session.document_mut().pages[0].name = "Cover".to_string();
        assert!(session.is_dirty());
        assert!(session.needs_save_prompt());

        // No backing path yet: save defers to save-as.
        assert!(!session.save().unwrap());
        assert!(session.is_dirty());
    }

    #[test]
    fn cancel_aborts_and_discard_proceeds() {
        let mut session = Session::new();
        session.document_mut();

        assert!(!session.resolve_unsaved(UnsavedChoice::Cancel).unwrap());
        assert!(session.is_dirty());

        assert!(session.resolve_unsaved(UnsavedChoice::Discard).unwrap());
    }

    #[test]
    fn save_choice_without_path_does_not_proceed() {
        let mut session = Session::new();
        session.document_mut();
        assert!(!session.resolve_unsaved(UnsavedChoice::Save).unwrap());
    }

    #[test]
    fn failed_open_resets_to_a_fresh_document() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.notebook");
        std::fs::write(&bad, "not json at all").unwrap();

        let mut session = Session::new();
        session.document_mut().pages[0].name = "Will be lost".to_string();

        assert!(session.open(&bad).is_err());
        assert!(!session.is_dirty());
        assert!(session.path().is_none());
        assert_eq!(session.document().pages[0].name, "Page 1");
    }

    #[test]
    fn save_as_round_trip_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.notebook");

        let mut session = Session::new();
        session.document_mut().pages[0].name = "Cover".to_string();
        session.save_as(&path).unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.path().unwrap(), path.as_path());

        let mut reopened = Session::new();
        reopened.open(&path).unwrap();
        assert_eq!(reopened.document().pages[0].name, "Cover");
    }
}
