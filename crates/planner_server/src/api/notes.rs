//! Phase note handlers.
//!
//! Create-note hands the raw body to the service, which parses it only after
//! the phase check. Malformed JSON is then reported like other unexpected
//! failures: a 400 whose `detail` is the error text, with the offending
//! payload logged.

use super::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::{error, info};
use planner_core::db::with_transaction;
use planner_core::logging::sanitize_message;
use planner_core::{
    NoteId, NoteRecord, NoteService, NoteServiceError, PhaseId, SqliteNoteRepository,
    SqlitePhaseRepository,
};
use rusqlite::Connection;

const MAX_PAYLOAD_LOG_CHARS: usize = 200;

fn note_service(
    conn: &Connection,
) -> Result<NoteService<SqlitePhaseRepository<'_>, SqliteNoteRepository<'_>>, NoteServiceError> {
    Ok(NoteService::new(
        SqlitePhaseRepository::try_new(conn)?,
        SqliteNoteRepository::try_new(conn)?,
    ))
}

/// GET /api/phases/:phase_id/notes/
pub(super) async fn list_notes(
    State(state): State<AppState>,
    phase_id: Result<Path<PhaseId>, PathRejection>,
) -> Result<Json<Vec<NoteRecord>>, ApiError> {
    let Path(phase_id) = phase_id.map_err(|_| ApiError::NotFound)?;
    let notes = state
        .with_conn(|conn| note_service(conn)?.list_notes(phase_id))
        .await?;
    Ok(Json(notes))
}

/// POST /api/phases/:phase_id/notes/
pub(super) async fn create_note(
    State(state): State<AppState>,
    phase_id: Result<Path<PhaseId>, PathRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<NoteRecord>), ApiError> {
    let Path(phase_id) = phase_id.map_err(|_| ApiError::NotFound)?;
    let payload = sanitize_message(&String::from_utf8_lossy(&body), MAX_PAYLOAD_LOG_CHARS);
    info!("event=note_create module=api status=start phase_id={phase_id} payload={payload}");

    let created = state
        .with_conn(|conn| {
            with_transaction(conn, |tx| {
                note_service(tx)?.create_note_from_json(phase_id, &body)
            })
        })
        .await
        .map_err(|err| {
            let error_code = match &err {
                NoteServiceError::MalformedBody(_) => "malformed_body",
                _ => "create_failed",
            };
            error!(
                "event=note_create module=api status=error phase_id={phase_id} error_code={error_code} payload={payload} error={err}"
            );
            ApiError::from_note_create(err)
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/phases/:phase_id/notes/:note_id/
pub(super) async fn get_note(
    State(state): State<AppState>,
    ids: Result<Path<(PhaseId, NoteId)>, PathRejection>,
) -> Result<Json<NoteRecord>, ApiError> {
    let Path((phase_id, note_id)) = ids.map_err(|_| ApiError::NotFound)?;
    let note = state
        .with_conn(|conn| note_service(conn)?.get_note(phase_id, note_id))
        .await?;
    Ok(Json(note))
}

/// DELETE /api/phases/:phase_id/notes/:note_id/
pub(super) async fn delete_note(
    State(state): State<AppState>,
    ids: Result<Path<(PhaseId, NoteId)>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path((phase_id, note_id)) = ids.map_err(|_| ApiError::NotFound)?;
    state
        .with_conn(|conn| note_service(conn)?.delete_note(phase_id, note_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
