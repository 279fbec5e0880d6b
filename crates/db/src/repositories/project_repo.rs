//! Repository for the `projects` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::project::{NewProject, Project, UpdateProject};
use crate::store::Filter;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, director, writer, production_name, date, \
     number_of_scenes, number_of_characters, users, characters, scenes, locations, \
     created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with empty reference sets and zero counters.
    pub async fn create<'e, E>(executor: E, input: &NewProject) -> Result<Project, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO projects
                 (title, description, director, writer, production_name, date, users)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.director)
            .bind(&input.writer)
            .bind(&input.production_name)
            .bind(input.date)
            .bind(&input.users)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Project>, sqlx::Error> {
        super::select_where(pool, "projects", COLUMNS, filter).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                director = COALESCE($4, director),
                writer = COALESCE($5, writer),
                production_name = COALESCE($6, production_name),
                date = COALESCE($7, date),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.director)
            .bind(&input.writer)
            .bind(&input.production_name)
            .bind(input.date)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project, returning the removed row.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Project>, sqlx::Error> {
        super::delete_returning(pool, "projects", COLUMNS, id).await
    }
}
