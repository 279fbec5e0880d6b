//! Handlers for `/projects/{project_id}/characters/{character_id}/costumes`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::costume::{Costume, CreateCostume, UpdateCostume};
use costume_engine::CascadeReport;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of the bulk scene attach.
#[derive(Debug, Deserialize)]
pub struct AttachScenes {
    pub scenes: Vec<String>,
}

/// GET .../characters/{character_id}/costumes
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<Costume>>> {
    let costumes = state
        .engine
        .list_costumes(user.caller(), &project_id, &character_id)
        .await?;
    Ok(Json(costumes))
}

/// POST .../characters/{character_id}/costumes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
    Json(input): Json<CreateCostume>,
) -> AppResult<(StatusCode, Json<Costume>)> {
    let costume = state
        .engine
        .create_costume(user.caller(), &project_id, &character_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(costume)))
}

/// DELETE .../characters/{character_id}/costumes
pub async fn delete_all(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
) -> AppResult<Json<Vec<CascadeReport>>> {
    let reports = state
        .engine
        .delete_all_costumes(user.caller(), &project_id, &character_id)
        .await?;
    Ok(Json(reports))
}

/// GET .../costumes/{costume_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id)): Path<(String, String, String)>,
) -> AppResult<Json<Value>> {
    let costume = state
        .engine
        .get_costume(user.caller(), &project_id, &character_id, &costume_id)
        .await?;
    Ok(Json(costume))
}

/// PUT .../costumes/{costume_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id)): Path<(String, String, String)>,
    Json(input): Json<UpdateCostume>,
) -> AppResult<Json<Costume>> {
    let costume = state
        .engine
        .update_costume(user.caller(), &project_id, &character_id, &costume_id, input)
        .await?;
    Ok(Json(costume))
}

/// DELETE .../costumes/{costume_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id)): Path<(String, String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_costume(user.caller(), &project_id, &character_id, &costume_id)
        .await?;
    Ok(Json(report))
}

/// PUT .../costumes/{costume_id}/scenes
pub async fn attach_scenes(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id)): Path<(String, String, String)>,
    Json(input): Json<AttachScenes>,
) -> AppResult<Json<Costume>> {
    let costume = state
        .engine
        .attach_costume_scenes(
            user.caller(),
            &project_id,
            &character_id,
            &costume_id,
            &input.scenes,
        )
        .await?;
    Ok(Json(costume))
}

/// PUT .../costumes/{costume_id}/scenes/{scene_id}
pub async fn attach_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id, scene_id)): Path<(String, String, String, String)>,
) -> AppResult<Json<Costume>> {
    let costume = state
        .engine
        .attach_costume_scene(user.caller(), &project_id, &character_id, &costume_id, &scene_id)
        .await?;
    Ok(Json(costume))
}

/// DELETE .../costumes/{costume_id}/scenes/{scene_id}
pub async fn detach_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id, costume_id, scene_id)): Path<(String, String, String, String)>,
) -> AppResult<Json<Costume>> {
    let costume = state
        .engine
        .detach_costume_scene(user.caller(), &project_id, &character_id, &costume_id, &scene_id)
        .await?;
    Ok(Json(costume))
}
