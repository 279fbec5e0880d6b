//! Repository for the `scenes` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::scene::{NewScene, Scene, UpdateScene};
use crate::store::Filter;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, scene_number, story_day_number, description, time_of_day, \
     season, number_of_actors, number_of_extras, location_id, characters, costumes, \
     created_at, updated_at";

/// Provides CRUD operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    pub async fn create<'e, E>(executor: E, input: &NewScene) -> Result<Scene, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO scenes
                (project_id, scene_number, story_day_number, description, time_of_day, season,
                 number_of_actors, number_of_extras)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(input.project_id)
            .bind(&input.scene_number)
            .bind(&input.story_day_number)
            .bind(&input.description)
            .bind(&input.time_of_day)
            .bind(&input.season)
            .bind(input.number_of_actors)
            .bind(input.number_of_extras)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Scene>, sqlx::Error> {
        super::select_where(pool, "scenes", COLUMNS, filter).await
    }

    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                scene_number = COALESCE($2, scene_number),
                story_day_number = COALESCE($3, story_day_number),
                description = COALESCE($4, description),
                time_of_day = COALESCE($5, time_of_day),
                season = COALESCE($6, season),
                number_of_actors = COALESCE($7, number_of_actors),
                number_of_extras = COALESCE($8, number_of_extras),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.scene_number)
            .bind(&input.story_day_number)
            .bind(&input.description)
            .bind(&input.time_of_day)
            .bind(&input.season)
            .bind(input.number_of_actors)
            .bind(input.number_of_extras)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Scene>, sqlx::Error> {
        super::delete_returning(pool, "scenes", COLUMNS, id).await
    }
}
