//! Handlers for `/projects/{project_id}/characters/{character_id}/measurements`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::measurements::{Measurements, MeasurementsInput, UpdateMeasurements};
use costume_engine::CascadeReport;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET .../measurements
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
) -> AppResult<Json<Measurements>> {
    let measurements = state
        .engine
        .get_measurements(user.caller(), &project_id, &character_id)
        .await?;
    Ok(Json(measurements))
}

/// POST .../measurements -- creates, replacing any previous record.
pub async fn replace(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
    Json(input): Json<MeasurementsInput>,
) -> AppResult<(StatusCode, Json<Measurements>)> {
    let measurements = state
        .engine
        .put_measurements(user.caller(), &project_id, &character_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(measurements)))
}

/// PUT .../measurements
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
    Json(input): Json<UpdateMeasurements>,
) -> AppResult<Json<Measurements>> {
    let measurements = state
        .engine
        .update_measurements(user.caller(), &project_id, &character_id, input)
        .await?;
    Ok(Json(measurements))
}

/// DELETE .../measurements
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_measurements(user.caller(), &project_id, &character_id)
        .await?;
    Ok(Json(report))
}
