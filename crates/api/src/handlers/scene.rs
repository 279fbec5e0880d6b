//! Handlers for `/projects/{project_id}/scenes`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::scene::{CreateScene, Scene, UpdateScene};
use costume_engine::CascadeReport;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{ExpandParams, SearchParams};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DuplicateNumbers {
    pub duplicates: Vec<String>,
}

/// GET /api/v1/projects/{project_id}/scenes
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Scene>>> {
    let scenes = state.engine.list_scenes(user.caller(), &project_id).await?;
    Ok(Json(scenes))
}

/// GET /api/v1/projects/{project_id}/scenes/search?q=
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Scene>>> {
    let scenes = state
        .engine
        .search_scenes(user.caller(), &project_id, &params.q)
        .await?;
    Ok(Json(scenes))
}

/// GET /api/v1/projects/{project_id}/scenes/duplicate-numbers
pub async fn duplicate_numbers(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<DuplicateNumbers>> {
    let duplicates = state
        .engine
        .duplicate_scene_numbers(user.caller(), &project_id)
        .await?;
    Ok(Json(DuplicateNumbers { duplicates }))
}

/// POST /api/v1/projects/{project_id}/scenes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<CreateScene>,
) -> AppResult<(StatusCode, Json<Scene>)> {
    let scene = state
        .engine
        .create_scene(user.caller(), &project_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(scene)))
}

/// GET /api/v1/projects/{project_id}/scenes/{scene_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, scene_id)): Path<(String, String)>,
    Query(params): Query<ExpandParams>,
) -> AppResult<Json<Value>> {
    let scene = state
        .engine
        .get_scene(user.caller(), &project_id, &scene_id, &params.paths())
        .await?;
    Ok(Json(scene))
}

/// PUT /api/v1/projects/{project_id}/scenes/{scene_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, scene_id)): Path<(String, String)>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<Scene>> {
    let scene = state
        .engine
        .update_scene(user.caller(), &project_id, &scene_id, input)
        .await?;
    Ok(Json(scene))
}

/// DELETE /api/v1/projects/{project_id}/scenes/{scene_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, scene_id)): Path<(String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_scene(user.caller(), &project_id, &scene_id)
        .await?;
    Ok(Json(report))
}

/// PUT /api/v1/projects/{project_id}/scenes/{scene_id}/characters/{character_id}
pub async fn attach_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, scene_id, character_id)): Path<(String, String, String)>,
) -> AppResult<Json<Scene>> {
    let scene = state
        .engine
        .attach_scene_character(user.caller(), &project_id, &scene_id, &character_id)
        .await?;
    Ok(Json(scene))
}

/// DELETE /api/v1/projects/{project_id}/scenes/{scene_id}/characters/{character_id}
pub async fn detach_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, scene_id, character_id)): Path<(String, String, String)>,
) -> AppResult<Json<Scene>> {
    let scene = state
        .engine
        .detach_scene_character(user.caller(), &project_id, &scene_id, &character_id)
        .await?;
    Ok(Json(scene))
}
