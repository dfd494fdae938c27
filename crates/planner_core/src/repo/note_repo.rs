//! Phase note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide note persistence scoped to one owning phase.
//! - Assign `created_at` at insertion.
//!
//! # Invariants
//! - Note lists are sorted by `created_at DESC, id DESC`.
//! - A note is only visible through the phase that owns it.
//! - `created_at` never goes backwards relative to the newest stored note.

use super::{ensure_connection_ready, EntityRef, RepoError, RepoResult};
use crate::model::curriculum::PhaseId;
use crate::model::note::{NewNote, Note, NoteId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    phase_id,
    content,
    created_at
FROM notes";

/// Repository interface for phase notes.
pub trait NoteRepository {
    /// Lists notes of one phase, newest first. Unknown phases yield an empty list.
    fn list_notes_for_phase(&self, phase_id: PhaseId) -> RepoResult<Vec<Note>>;
    /// Gets one note if it exists and belongs to `phase_id`.
    fn get_note(&self, phase_id: PhaseId, note_id: NoteId) -> RepoResult<Option<Note>>;
    /// Inserts one note bound to `phase_id` and returns its id.
    fn create_note(&self, phase_id: PhaseId, note: &NewNote) -> RepoResult<NoteId>;
    /// Deletes one note if it exists and belongs to `phase_id`.
    fn delete_note(&self, phase_id: PhaseId, note_id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn list_notes_for_phase(&self, phase_id: PhaseId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE phase_id = ?1
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([phase_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn get_note(&self, phase_id: PhaseId, note_id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE id = ?1
               AND phase_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![note_id, phase_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn create_note(&self, phase_id: PhaseId, note: &NewNote) -> RepoResult<NoteId> {
        let now_micros = Utc::now().timestamp_micros();
        self.conn.execute(
            "INSERT INTO notes (phase_id, content, created_at)
             VALUES (
                ?1,
                ?2,
                MAX(?3, COALESCE((SELECT MAX(created_at) FROM notes), 0))
             );",
            params![phase_id, note.content(), now_micros],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_note(&self, phase_id: PhaseId, note_id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND phase_id = ?2;",
            params![note_id, phase_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Note { phase_id, note_id }));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let created_at_micros: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_micros(created_at_micros).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_at_micros}` in notes.created_at"
        ))
    })?;

    Ok(Note {
        id: row.get("id")?,
        phase_id: row.get("phase_id")?,
        content: row.get("content")?,
        created_at,
    })
}
