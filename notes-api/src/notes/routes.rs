use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::{ctx::BaseParams, errors::Error, state::AppState, Result};

use super::{handlers, Note};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(find_notes).post(create_note))
        .route("/notes/{note_id}", get(get_note).patch(update_note).delete(delete_note))
        .with_state(state)
}

async fn find_notes(base: BaseParams) -> Result<Json<Vec<Note>>> {
    handlers::find_notes(base).await.map(Json)
}

async fn create_note(
    base: BaseParams,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>)> {
    handlers::create_note(body(payload), base)
        .await
        .map(|note| (StatusCode::CREATED, Json(note)))
}

async fn get_note(Path(note_id): Path<String>, base: BaseParams) -> Result<Json<Note>> {
    handlers::get_note(note_id, base).await.map(Json)
}

// A successful update answers 201; clients depend on it.
async fn update_note(
    Path(note_id): Path<String>,
    base: BaseParams,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>)> {
    handlers::update_note(note_id, body(payload), base)
        .await
        .map(|note| (StatusCode::CREATED, Json(note)))
}

async fn delete_note(Path(note_id): Path<String>, base: BaseParams) -> Result<Json<Note>> {
    handlers::delete_note(note_id, base).await.map(Json)
}

/// Body deserialization failures become validation errors, but only once the
/// handler has passed its auth gate; a missing token still wins with a 401.
fn body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|_| Error::Validation("Invalid Request Body".into()))
}
