//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Inserts accept any executor so
//! they can run inside a transaction. Reference-set and singular-reference
//! writes for every kind live in [`RelationRepo`].

pub mod character_repo;
pub mod costume_repo;
pub mod image_repo;
pub mod location_repo;
pub mod measurements_repo;
pub mod project_repo;
pub mod relation_repo;
pub mod scene_repo;

pub use character_repo::CharacterRepo;
pub use costume_repo::CostumeRepo;
pub use image_repo::ImageRepo;
pub use location_repo::LocationRepo;
pub use measurements_repo::MeasurementsRepo;
pub use project_repo::ProjectRepo;
pub use relation_repo::RelationRepo;
pub use scene_repo::SceneRepo;

use costume_core::kinds::EntityKind;
use costume_core::types::EntityId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::store::Filter;

/// Table holding records of `kind`.
pub fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => "projects",
        EntityKind::Character => "characters",
        EntityKind::Costume => "costumes",
        EntityKind::Scene => "scenes",
        EntityKind::Location => "locations",
        EntityKind::Measurements => "measurements",
        EntityKind::Image => "images",
    }
}

/// Run a `SELECT {columns} FROM {table}` restricted by `filter`.
pub(crate) async fn select_where<T>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    filter: &Filter,
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    const ORDER: &str = "ORDER BY created_at ASC, id ASC";
    match filter {
        Filter::All => {
            let query = format!("SELECT {columns} FROM {table} {ORDER}");
            sqlx::query_as::<_, T>(&query).fetch_all(pool).await
        }
        Filter::Ids(ids) => {
            let query = format!("SELECT {columns} FROM {table} WHERE id = ANY($1) {ORDER}");
            sqlx::query_as::<_, T>(&query)
                .bind(ids)
                .fetch_all(pool)
                .await
        }
        Filter::Contains(relation, id) => {
            let query = format!(
                "SELECT {columns} FROM {table} WHERE $1 = ANY({}) {ORDER}",
                relation.name()
            );
            sqlx::query_as::<_, T>(&query)
                .bind(id)
                .fetch_all(pool)
                .await
        }
        Filter::RefersTo(field, id) => {
            let query = format!(
                "SELECT {columns} FROM {table} WHERE {} = $1 {ORDER}",
                field.column()
            );
            sqlx::query_as::<_, T>(&query)
                .bind(id)
                .fetch_all(pool)
                .await
        }
        Filter::HasMember(user) => {
            let query = format!("SELECT {columns} FROM {table} WHERE $1 = ANY(users) {ORDER}");
            sqlx::query_as::<_, T>(&query)
                .bind(user)
                .fetch_all(pool)
                .await
        }
    }
}

/// Delete a single row, returning it.
pub(crate) async fn delete_returning<T>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    id: EntityId,
) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = format!("DELETE FROM {table} WHERE id = $1 RETURNING {columns}");
    sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Delete every listed row of `kind`. Returns the number removed.
pub async fn delete_many(
    pool: &PgPool,
    kind: EntityKind,
    ids: &[EntityId],
) -> Result<u64, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = ANY($1)", table(kind));
    let result = sqlx::query(&query).bind(ids).execute(pool).await?;
    Ok(result.rows_affected())
}

/// Whether a row with `id` exists in the table for `kind`.
pub async fn exists(pool: &PgPool, kind: EntityKind, id: EntityId) -> Result<bool, sqlx::Error> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table(kind));
    sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(pool)
        .await
}
