//! Repository for the `images` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::image::{Image, NewImage};
use crate::store::Filter;

const COLUMNS: &str =
    "id, project_id, name, image_url, characters, scenes, costumes, created_at, updated_at";

pub struct ImageRepo;

impl ImageRepo {
    pub async fn create<'e, E>(executor: E, input: &NewImage) -> Result<Image, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO images (project_id, name, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.image_url)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Image>, sqlx::Error> {
        super::select_where(pool, "images", COLUMNS, filter).await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Image>, sqlx::Error> {
        super::delete_returning(pool, "images", COLUMNS, id).await
    }
}
