//! Repository for the `characters` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::character::{Character, NewCharacter, UpdateCharacter};
use crate::store::Filter;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, actor_name, age, image_url, number_of_costumes, \
     measurements_id, scenes, costumes, created_at, updated_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    pub async fn create<'e, E>(executor: E, input: &NewCharacter) -> Result<Character, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO characters (project_id, name, actor_name, age, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(&input.actor_name)
            .bind(&input.age)
            .bind(&input.image_url)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Character>, sqlx::Error> {
        super::select_where(pool, "characters", COLUMNS, filter).await
    }

    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET
                name = COALESCE($2, name),
                actor_name = COALESCE($3, actor_name),
                age = COALESCE($4, age),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.actor_name)
            .bind(&input.age)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Character>, sqlx::Error> {
        super::delete_returning(pool, "characters", COLUMNS, id).await
    }
}
