//! Read-only curriculum handlers.

use super::ApiError;
use crate::state::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use planner_core::{
    CurriculumService, CurriculumServiceError, PhaseId, PhaseRecord, SqlitePhaseRepository,
};

/// GET /api/phases/
pub(super) async fn list_phases(
    State(state): State<AppState>,
) -> Result<Json<Vec<PhaseRecord>>, ApiError> {
    let phases = state
        .with_conn(|conn| -> Result<_, CurriculumServiceError> {
            CurriculumService::new(SqlitePhaseRepository::try_new(conn)?).list_phases()
        })
        .await?;
    Ok(Json(phases))
}

/// GET /api/phases/:phase_id/
pub(super) async fn get_phase(
    State(state): State<AppState>,
    phase_id: Result<Path<PhaseId>, PathRejection>,
) -> Result<Json<PhaseRecord>, ApiError> {
    let Path(phase_id) = phase_id.map_err(|_| ApiError::NotFound)?;
    let phase = state
        .with_conn(|conn| -> Result<_, CurriculumServiceError> {
            CurriculumService::new(SqlitePhaseRepository::try_new(conn)?).get_phase(phase_id)
        })
        .await?;
    Ok(Json(phase))
}
