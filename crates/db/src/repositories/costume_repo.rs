//! Repository for the `costumes` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::costume::{Costume, NewCostume, UpdateCostume};
use crate::store::Filter;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, character_id, costume_number, description, elements, \
     gender, image_url, number_of_scenes, scenes, created_at, updated_at";

/// Provides CRUD operations for costumes.
///
/// `(character_id, costume_number)` is unique in the schema, so a number
/// collision that slips past the engine's check still fails here.
pub struct CostumeRepo;

impl CostumeRepo {
    pub async fn create<'e, E>(executor: E, input: &NewCostume) -> Result<Costume, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO costumes
                (project_id, character_id, costume_number, description, elements, gender, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Costume>(&query)
            .bind(input.project_id)
            .bind(input.character_id)
            .bind(input.costume_number)
            .bind(&input.description)
            .bind(&input.elements)
            .bind(&input.gender)
            .bind(&input.image_url)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Costume>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM costumes WHERE id = $1");
        sqlx::query_as::<_, Costume>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Costume>, sqlx::Error> {
        super::select_where(pool, "costumes", COLUMNS, filter).await
    }

    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateCostume,
    ) -> Result<Option<Costume>, sqlx::Error> {
        let query = format!(
            "UPDATE costumes SET
                costume_number = COALESCE($2, costume_number),
                description = COALESCE($3, description),
                elements = COALESCE($4, elements),
                gender = COALESCE($5, gender),
                image_url = COALESCE($6, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Costume>(&query)
            .bind(id)
            .bind(input.costume_number)
            .bind(&input.description)
            .bind(&input.elements)
            .bind(&input.gender)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Costume>, sqlx::Error> {
        super::delete_returning(pool, "costumes", COLUMNS, id).await
    }
}
