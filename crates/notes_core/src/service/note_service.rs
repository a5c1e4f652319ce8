//! Note use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points for callers.
//! - Check existence before mutation and report absence as a typed error.
//!
//! # Invariants
//! - `update_note` fully replaces title and content, never merges.
//! - Missing notes leave the store unchanged.
//! - Storage failures are propagated unchanged, never swallowed.
//! - Log events carry ids only, never note text.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every note in store order.
    pub fn get_all_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.find_all()
    }

    /// Gets one note by id; absence is `Ok(None)`.
    pub fn get_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.find_by_id(id)
    }

    /// Persists a new note and returns it with its assigned id.
    ///
    /// Any id already set on `note` is discarded; this always inserts.
    pub fn create_note(&self, note: Note) -> Result<Note, NoteServiceError> {
        let draft = Note { id: None, ..note };
        let created = self.repo.save(&draft).inspect_err(|err| {
            error!("event=note_create module=service status=error error={err}");
        })?;

        info!(
            "event=note_create module=service status=ok note_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    /// Replaces title and content of an existing note.
    ///
    /// # Errors
    /// - `NoteNotFound` when `id` is absent; nothing is written.
    /// - `Repo` for storage failures.
    pub fn update_note(&self, id: NoteId, details: &Note) -> Result<Note, NoteServiceError> {
        let Some(mut note) = self.repo.find_by_id(id)? else {
            info!("event=note_update module=service status=not_found note_id={id}");
            return Err(NoteServiceError::NoteNotFound(id));
        };

        note.replace_fields(details);
        let updated = self.repo.save(&note)?;

        info!("event=note_update module=service status=ok note_id={id}");
        Ok(updated)
    }

    /// Removes an existing note.
    ///
    /// # Errors
    /// - `NoteNotFound` when `id` is absent.
    /// - `Repo` for storage failures.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        if self.repo.find_by_id(id)?.is_none() {
            info!("event=note_delete module=service status=not_found note_id={id}");
            return Err(NoteServiceError::NoteNotFound(id));
        }

        self.repo.delete_by_id(id)?;

        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Returns the number of stored notes.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count()
    }
}
