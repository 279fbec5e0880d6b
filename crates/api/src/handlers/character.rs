//! Handlers for `/projects/{project_id}/characters`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use costume_engine::CascadeReport;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ExpandParams;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/characters
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(params): Query<ExpandParams>,
) -> AppResult<Json<Value>> {
    let characters = state
        .engine
        .list_characters(user.caller(), &project_id, &params.paths())
        .await?;
    Ok(Json(characters))
}

/// POST /api/v1/projects/{project_id}/characters
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let character = state
        .engine
        .create_character(user.caller(), &project_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/projects/{project_id}/characters/{character_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
    Query(params): Query<ExpandParams>,
) -> AppResult<Json<Value>> {
    let character = state
        .engine
        .get_character(user.caller(), &project_id, &character_id, &params.paths())
        .await?;
    Ok(Json(character))
}

/// PUT /api/v1/projects/{project_id}/characters/{character_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let character = state
        .engine
        .update_character(user.caller(), &project_id, &character_id, input)
        .await?;
    Ok(Json(character))
}

/// DELETE /api/v1/projects/{project_id}/characters/{character_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, character_id)): Path<(String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_character(user.caller(), &project_id, &character_id)
        .await?;
    Ok(Json(report))
}
