//! Note domain model.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, then never changes.
//! - Ids are never reused for another note.

use serde::{Deserialize, Serialize};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// A short text note with a title and a content body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// `None` for notes that were not persisted yet.
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
}

impl Note {
    /// Creates an unsaved note. The store assigns the id on first save.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Creates a note carrying an already-assigned id.
    pub fn with_id(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns whether the store has assigned an id to this note.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Fully replaces title and content with the values in `details`.
    ///
    /// The id of `details` is ignored; nothing is merged.
    pub fn replace_fields(&mut self, details: &Note) {
        self.title = details.title.clone();
        self.content = details.content.clone();
    }
}
