//! Handlers for `/projects/{project_id}/images`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::image::{CreateImage, Image};
use costume_engine::CascadeReport;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/images
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<Vec<Image>>> {
    let images = state.engine.list_images(user.caller(), &project_id).await?;
    Ok(Json(images))
}

/// POST /api/v1/projects/{project_id}/images
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<CreateImage>,
) -> AppResult<(StatusCode, Json<Image>)> {
    let image = state
        .engine
        .create_image(user.caller(), &project_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// GET /api/v1/projects/{project_id}/images/{image_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, image_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let image = state
        .engine
        .get_image(user.caller(), &project_id, &image_id)
        .await?;
    Ok(Json(image))
}

/// DELETE /api/v1/projects/{project_id}/images/{image_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, image_id)): Path<(String, String)>,
) -> AppResult<Json<CascadeReport>> {
    let report = state
        .engine
        .delete_image(user.caller(), &project_id, &image_id)
        .await?;
    Ok(Json(report))
}
