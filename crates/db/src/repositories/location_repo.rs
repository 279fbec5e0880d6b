//! Repository for the `locations` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::location::{Location, NewLocation, UpdateLocation};
use crate::store::Filter;

const COLUMNS: &str = "id, project_id, decor, locale, scenes, created_at, updated_at";

pub struct LocationRepo;

impl LocationRepo {
    pub async fn create<'e, E>(executor: E, input: &NewLocation) -> Result<Location, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO locations (project_id, decor, locale)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(input.project_id)
            .bind(&input.decor)
            .bind(&input.locale)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Location>, sqlx::Error> {
        super::select_where(pool, "locations", COLUMNS, filter).await
    }

    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                decor = COALESCE($2, decor),
                locale = COALESCE($3, locale),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.decor)
            .bind(&input.locale)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Location>, sqlx::Error> {
        super::delete_returning(pool, "locations", COLUMNS, id).await
    }
}
