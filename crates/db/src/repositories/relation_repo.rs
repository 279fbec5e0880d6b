//! Atomic reference-set and singular-reference writes for every table.
//!
//! Sets are `UUID[]` columns. Each write is a single `UPDATE` that changes the
//! array and, when the set has one, recomputes its counter from the new array
//! in the same statement, so concurrent writers never lose each other's
//! members and counters cannot drift.

use costume_core::relations::{Field, Relation};
use costume_core::types::EntityId;
use sqlx::PgPool;

use super::table;

/// `, counter = cardinality(expr)` for sets that carry a counter.
fn counter_assignment(relation: Relation, new_value: &str) -> String {
    match relation.counter() {
        Some(counter) => format!(", {counter} = cardinality({new_value})"),
        None => String::new(),
    }
}

pub struct RelationRepo;

impl RelationRepo {
    /// Append `member` unless already present.
    ///
    /// Returns the number of rows changed (0 when the member was present or
    /// the owner does not exist).
    pub async fn add(
        pool: &PgPool,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> Result<u64, sqlx::Error> {
        let col = relation.name();
        let new_value = format!("array_append({col}, $2)");
        let query = format!(
            "UPDATE {table} SET {col} = {new_value}{counter}, updated_at = NOW()
             WHERE id = $1 AND NOT ($2 = ANY({col}))",
            table = table(relation.owner()),
            counter = counter_assignment(relation, &new_value),
        );
        let result = sqlx::query(&query)
            .bind(owner)
            .bind(member)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Append every member not already present in one statement.
    ///
    /// Returns `false` when the owner does not exist.
    pub async fn add_many(
        pool: &PgPool,
        relation: Relation,
        owner: EntityId,
        members: &[EntityId],
    ) -> Result<bool, sqlx::Error> {
        let col = relation.name();
        let table = table(relation.owner());
        let mut distinct: Vec<EntityId> = Vec::with_capacity(members.len());
        for member in members {
            if !distinct.contains(member) {
                distinct.push(*member);
            }
        }
        let new_value = format!(
            "{col} || ARRAY(SELECT m FROM unnest($2::uuid[]) AS m WHERE NOT (m = ANY(t.{col})))"
        );
        let query = format!(
            "UPDATE {table} AS t SET {col} = {new_value}{counter}, updated_at = NOW()
             WHERE t.id = $1",
            counter = counter_assignment(relation, &new_value),
        );
        let result = sqlx::query(&query)
            .bind(owner)
            .bind(&distinct)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove `member` if present. Returns the number of rows changed.
    pub async fn remove(
        pool: &PgPool,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> Result<u64, sqlx::Error> {
        let col = relation.name();
        let new_value = format!("array_remove({col}, $2)");
        let query = format!(
            "UPDATE {table} SET {col} = {new_value}{counter}, updated_at = NOW()
             WHERE id = $1 AND $2 = ANY({col})",
            table = table(relation.owner()),
            counter = counter_assignment(relation, &new_value),
        );
        let result = sqlx::query(&query)
            .bind(owner)
            .bind(member)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove `member` from the set of every owner that holds it.
    pub async fn pull_from_all(
        pool: &PgPool,
        relation: Relation,
        member: EntityId,
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        let col = relation.name();
        let new_value = format!("array_remove({col}, $1)");
        let query = format!(
            "UPDATE {table} SET {col} = {new_value}{counter}, updated_at = NOW()
             WHERE $1 = ANY({col})
             RETURNING id",
            table = table(relation.owner()),
            counter = counter_assignment(relation, &new_value),
        );
        sqlx::query_scalar::<_, EntityId>(&query)
            .bind(member)
            .fetch_all(pool)
            .await
    }

    /// Set an optional reference, returning the previous value.
    ///
    /// The outer `None` means the owner does not exist.
    pub async fn replace_singular(
        pool: &PgPool,
        field: Field,
        owner: EntityId,
        value: Option<EntityId>,
    ) -> Result<Option<Option<EntityId>>, sqlx::Error> {
        let col = field.column();
        let query = format!(
            "UPDATE {table} AS t SET {col} = $2, updated_at = NOW()
             FROM {table} AS prev
             WHERE t.id = $1 AND prev.id = $1
             RETURNING prev.{col}",
            table = table(field.owner()),
        );
        sqlx::query_scalar::<_, Option<EntityId>>(&query)
            .bind(owner)
            .bind(value)
            .fetch_optional(pool)
            .await
    }

    /// Unset `field` wherever it equals `value`.
    pub async fn clear_singular_everywhere(
        pool: &PgPool,
        field: Field,
        value: EntityId,
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        let col = field.column();
        let query = format!(
            "UPDATE {table} SET {col} = NULL, updated_at = NOW()
             WHERE {col} = $1
             RETURNING id",
            table = table(field.owner()),
        );
        sqlx::query_scalar::<_, EntityId>(&query)
            .bind(value)
            .fetch_all(pool)
            .await
    }
}
