pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route below `/projects/{project_id}` is scoped to one project and
/// requires the caller to be one of its members.
///
/// ```text
/// /projects                                         list, create
/// /projects/{project_id}                            get (?expand=), update, delete
/// /projects/{project_id}/members/{user_id}          add (POST), remove (DELETE)
/// /projects/{project_id}/integrity                  integrity report (GET)
/// /projects/{project_id}/characters/...             characters, costumes, measurements
/// /projects/{project_id}/scenes/...                 scenes, search, character links
/// /projects/{project_id}/locations/...              locations, scene links
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects", project::router())
}
