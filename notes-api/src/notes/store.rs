use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{self, DB};
use crate::ident::RecordId;

use super::{NewNote, Note, NoteUpdate};

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            completed: row.get(2)?,
            creator_id: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

pub async fn create(db: &DB, creator_id: RecordId, new_note: NewNote) -> db::Result<Note> {
    let id = RecordId::generate();
    let created_at = Utc::now();

    db.call(move |conn| {
        conn.query_row(
            r#"INSERT INTO notes (id, text, completed, creator_id, created_at) VALUES (?, ?, ?, ?, ?)
            RETURNING id, text, completed, creator_id, created_at"#,
            params![id, new_note.text, new_note.completed, creator_id, created_at],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

/// All notes created by `owner_id`, in insertion order. An owner with no
/// notes yields an empty vec, never an error.
pub async fn list_by_owner(db: &DB, owner_id: RecordId) -> db::Result<Vec<Note>> {
    db.call(move |conn| {
        let notes = conn
            .prepare(
                "SELECT id, text, completed, creator_id, created_at FROM notes WHERE creator_id = ? ORDER BY rowid",
            )?
            .query_map(params![owner_id], |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
}

/// Absent is a distinct outcome from "found but not owned"; ownership is the
/// caller's concern.
pub async fn find_by_id(db: &DB, note_id: RecordId) -> db::Result<Note> {
    db.call(move |conn| {
        let note = conn.query_row(
            "SELECT id, text, completed, creator_id, created_at FROM notes WHERE id = ?",
            params![note_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
}

pub async fn update(db: &DB, note_id: RecordId, patch: NoteUpdate) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            r#"UPDATE notes SET completed = coalesce(?, completed)
            WHERE id = ?
            RETURNING id, text, completed, creator_id, created_at"#,
            params![patch.completed, note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}

pub async fn delete(db: &DB, note_id: RecordId) -> db::Result<Note> {
    db.call(move |conn| {
        conn.query_row(
            r#"DELETE FROM notes
            WHERE id = ?
            RETURNING id, text, completed, creator_id, created_at"#,
            params![note_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
}
