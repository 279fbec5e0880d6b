//! Repository for the `measurements` table.

use costume_core::types::EntityId;
use sqlx::{PgExecutor, PgPool};

use crate::models::measurements::{Measurements, NewMeasurements, UpdateMeasurements};
use crate::store::Filter;

const COLUMNS: &str = "id, project_id, character_id, height, shoulders, chest, waist, hips, \
     arm, leg, unit, shirt_size, coat_size, trousers_size, shoe_size, suit_size, bra_size, \
     created_at, updated_at";

/// Provides CRUD operations for measurements. The table carries a unique
/// index on `character_id`.
pub struct MeasurementsRepo;

impl MeasurementsRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &NewMeasurements,
    ) -> Result<Measurements, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let v = &input.values;
        let query = format!(
            "INSERT INTO measurements
                (project_id, character_id, height, shoulders, chest, waist, hips, arm, leg, unit,
                 shirt_size, coat_size, trousers_size, shoe_size, suit_size, bra_size)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurements>(&query)
            .bind(input.project_id)
            .bind(input.character_id)
            .bind(v.height)
            .bind(v.shoulders)
            .bind(v.chest)
            .bind(v.waist)
            .bind(v.hips)
            .bind(v.arm)
            .bind(v.leg)
            .bind(&v.unit)
            .bind(&v.shirt_size)
            .bind(&v.coat_size)
            .bind(&v.trousers_size)
            .bind(&v.shoe_size)
            .bind(&v.suit_size)
            .bind(&v.bra_size)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<Measurements>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM measurements WHERE id = $1");
        sqlx::query_as::<_, Measurements>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find(pool: &PgPool, filter: &Filter) -> Result<Vec<Measurements>, sqlx::Error> {
        super::select_where(pool, "measurements", COLUMNS, filter).await
    }

    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateMeasurements,
    ) -> Result<Option<Measurements>, sqlx::Error> {
        let query = format!(
            "UPDATE measurements SET
                height = COALESCE($2, height),
                shoulders = COALESCE($3, shoulders),
                chest = COALESCE($4, chest),
                waist = COALESCE($5, waist),
                hips = COALESCE($6, hips),
                arm = COALESCE($7, arm),
                leg = COALESCE($8, leg),
                unit = COALESCE($9, unit),
                shirt_size = COALESCE($10, shirt_size),
                coat_size = COALESCE($11, coat_size),
                trousers_size = COALESCE($12, trousers_size),
                shoe_size = COALESCE($13, shoe_size),
                suit_size = COALESCE($14, suit_size),
                bra_size = COALESCE($15, bra_size),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Measurements>(&query)
            .bind(id)
            .bind(input.height)
            .bind(input.shoulders)
            .bind(input.chest)
            .bind(input.waist)
            .bind(input.hips)
            .bind(input.arm)
            .bind(input.leg)
            .bind(&input.unit)
            .bind(&input.shirt_size)
            .bind(&input.coat_size)
            .bind(&input.trousers_size)
            .bind(&input.shoe_size)
            .bind(&input.suit_size)
            .bind(&input.bra_size)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<Option<Measurements>, sqlx::Error> {
        super::delete_returning(pool, "measurements", COLUMNS, id).await
    }
}
