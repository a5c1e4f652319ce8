//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide find/save/delete APIs over the `notes` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` inserts when `id` is unset and overwrites when it is set.
//! - Ids come from `AUTOINCREMENT` and are never recycled.
//! - Listing order is ascending id, which is insertion order.

use crate::db::schema::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOTE_SELECT_SQL: &str = "SELECT id, title, content FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(NoteId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for notes.
pub trait NoteRepository {
    /// Returns every stored note in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Note>>;
    /// Returns one note, or `None` when the id is absent.
    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts an id-less note or overwrites the row for an existing id.
    ///
    /// Returns the persisted note, including the assigned id.
    fn save(&self, note: &Note) -> RepoResult<Note>;
    /// Removes the note; fails with `NotFound` when the id is absent.
    fn delete_by_id(&self, id: NoteId) -> RepoResult<()>;
    /// Returns the number of stored notes.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a connection returned by `db::open_db*`.
    ///
    /// # Errors
    /// - `InvalidData` when the connection does not carry the notes schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version = current_user_version(conn)?;
        if version != latest_version() {
            return Err(RepoError::InvalidData(format!(
                "schema version {version} does not match expected {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }

    fn insert(&self, note: &Note) -> RepoResult<Note> {
        self.conn.execute(
            "INSERT INTO notes (title, content) VALUES (?1, ?2);",
            params![note.title.as_str(), note.content.as_str()],
        )?;

        Ok(Note::with_id(
            self.conn.last_insert_rowid(),
            note.title.clone(),
            note.content.clone(),
        ))
    }

    fn overwrite(&self, id: NoteId, note: &Note) -> RepoResult<Note> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?1, content = ?2 WHERE id = ?3;",
            params![note.title.as_str(), note.content.as_str(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(Note::with_id(id, note.title.clone(), note.content.clone()))
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn find_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();

        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn find_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn save(&self, note: &Note) -> RepoResult<Note> {
        match note.id {
            None => self.insert(note),
            Some(id) => self.overwrite(id, note),
        }
    }

    fn delete_by_id(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{count}`")))
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id: i64 = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in notes.id"
        )));
    }

    let title: String = row.get("title")?;
    let content: String = row.get("content")?;
    Ok(Note::with_id(id, title, content))
}
