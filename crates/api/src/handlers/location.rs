//! Handlers for `/projects/{project_id}/locations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::location::{CreateLocation, Location, UpdateLocation};
use costume_db::models::scene::Scene;
use costume_engine::CascadeReport;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/locations
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state.engine.list_locations(user.caller(), &project_id).await?;
    Ok(Json(locations))
}

/// POST /api/v1/projects/{project_id}/locations
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let location = state
        .engine
        .create_location(user.caller(), &project_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/v1/projects/{project_id}/locations/{location_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, location_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let location = state
        .engine
        .get_location(user.caller(), &project_id, &location_id)
        .await?;
    Ok(Json(location))
}

/// PUT /api/v1/projects/{project_id}/locations/{location_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, location_id)): Path<(String, String)>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<Location>> {
    let location = state
        .engine
        .update_location(user.caller(), &project_id, &location_id, input)
        .await?;
    Ok(Json(location))
}

/// DELETE /api/v1/projects/{project_id}/locations/{location_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, location_id)): Path<(String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_location(user.caller(), &project_id, &location_id)
        .await?;
    Ok(Json(report))
}

/// PUT /api/v1/projects/{project_id}/locations/{location_id}/scenes/{scene_id}
pub async fn attach_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, location_id, scene_id)): Path<(String, String, String)>,
) -> AppResult<Json<Scene>> {
    let scene = state
        .engine
        .attach_location_scene(user.caller(), &project_id, &location_id, &scene_id)
        .await?;
    Ok(Json(scene))
}

/// DELETE /api/v1/projects/{project_id}/locations/{location_id}/scenes/{scene_id}
pub async fn detach_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, location_id, scene_id)): Path<(String, String, String)>,
) -> AppResult<Json<Scene>> {
    let scene = state
        .engine
        .detach_location_scene(user.caller(), &project_id, &location_id, &scene_id)
        .await?;
    Ok(Json(scene))
}
