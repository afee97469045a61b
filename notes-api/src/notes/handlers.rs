//! Per-request pipelines. Each handler is a short linear sequence with early
//! exits: auth, then id format, then fetch, then ownership, then (for writes)
//! payload validation. The order is part of the wire contract; see DESIGN.md.

use serde_json::Value;

use crate::{ctx::BaseParams, errors::Error, ident::RecordId, Result};

use super::{guard, store, NewNote, Note, NoteUpdate};

pub async fn create_note(payload: Result<Value>, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;
    let new_note = NewNote::parse(&payload?)?;

    let note = store::create(&db, user.id.clone(), new_note).await?;
    Ok(note)
}

pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    let user = ctx.require_user()?;

    let notes = store::list_by_owner(&db, user.id.clone()).await?;
    Ok(notes)
}

pub async fn get_note(note_id: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;
    let note_id = RecordId::parse(&note_id).map_err(|_| Error::InvalidId)?;

    let note = store::find_by_id(&db, note_id)
        .await
        .map_err(|e| e.not_found_message("Note Not Found"))?;
    guard::authorize(user, &note)?;

    Ok(note)
}

pub async fn update_note(note_id: String, payload: Result<Value>, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;
    let note_id = RecordId::parse(&note_id).map_err(|_| Error::InvalidId)?;

    let note = store::find_by_id(&db, note_id)
        .await
        .map_err(|e| e.not_found_message("Note Not Found"))?;
    guard::authorize(user, &note)?;

    // Payload is validated only after the ownership gate, so a foreign
    // caller sees the generic 400 rather than field-level messages.
    let patch = NoteUpdate::parse(&payload?)?;

    let note = store::update(&db, note.id.clone(), patch)
        .await
        .map_err(|e| e.not_found_message("Note Not Found"))?;
    Ok(note)
}

pub async fn delete_note(note_id: String, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user = ctx.require_user()?;
    let note_id = RecordId::parse(&note_id).map_err(|_| Error::InvalidId)?;

    let note = store::find_by_id(&db, note_id)
        .await
        .map_err(|e| e.not_found_message("Note Not Found"))?;
    guard::authorize(user, &note)?;

    // A concurrent delete can win the race; the loser sees "not found".
    let note = store::delete(&db, note.id.clone())
        .await
        .map_err(|e| e.not_found_message("Note Not Found"))?;
    Ok(note)
}
