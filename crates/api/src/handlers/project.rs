//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use costume_db::models::project::{CreateProject, Project, UpdateProject};
use costume_engine::{CascadeReport, IntegrityReport};
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ExpandParams;
use crate::state::AppState;

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Project>>> {
    let projects = state.engine.list_projects(user.caller()).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state.engine.create_project(user.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{project_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Query(params): Query<ExpandParams>,
) -> AppResult<Json<Value>> {
    let project = state
        .engine
        .get_project(user.caller(), &project_id, &params.paths())
        .await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = state
        .engine
        .update_project(user.caller(), &project_id, input)
        .await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{project_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<CascadeReport>> {
    let report = state.engine.delete_project(user.caller(), &project_id).await?;
    Ok(Json(report))
}

/// POST /api/v1/projects/{project_id}/members/{user_id}
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, member_id)): Path<(String, String)>,
) -> AppResult<Json<Project>> {
    let project = state
        .engine
        .add_member(user.caller(), &project_id, &member_id)
        .await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{project_id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, member_id)): Path<(String, String)>,
) -> AppResult<Json<Project>> {
    let project = state
        .engine
        .remove_member(user.caller(), &project_id, &member_id)
        .await?;
    Ok(Json(project))
}

/// GET /api/v1/projects/{project_id}/integrity
pub async fn integrity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> AppResult<Json<IntegrityReport>> {
    let report = state.engine.check_integrity(user.caller(), &project_id).await?;
    if !report.is_consistent() {
        tracing::warn!(
            project_id = %report.project_id,
            violations = report.violations.len(),
            "Project graph is inconsistent",
        );
    }
    Ok(Json(report))
}
