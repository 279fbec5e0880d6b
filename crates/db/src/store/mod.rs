//! The entity store abstraction and its two backends.
//!
//! [`EntityStore`] is the only way the engine touches persisted state. Every
//! relation primitive updates the set and its tied counter in one atomic
//! write, so callers never compute a counter and store it back.

pub mod expand;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use costume_core::error::CoreError;
use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use costume_core::types::{EntityId, UserId};

use crate::models::{NewRecord, Record, RecordPatch};

pub use expand::expand;
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} does not exist")]
    Missing { kind: EntityKind, id: EntityId },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The call does not make sense for this kind (e.g. a relation on the
    /// wrong owner). Indicates a programming error in the caller.
    #[error("Unsupported store call: {0}")]
    Unsupported(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn missing(kind: EntityKind, id: EntityId) -> Self {
        StoreError::Missing { kind, id }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Missing { .. })
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Missing { kind, id } => CoreError::NotFound {
                entity: kind.name(),
                id,
            },
            StoreError::Conflict(msg) => CoreError::Conflict(msg),
            StoreError::Unsupported(msg) => CoreError::Validation(msg),
            StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
            StoreError::Database(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some("23505") =>
            {
                CoreError::Conflict(
                    db_err
                        .constraint()
                        .map(|c| format!("Duplicate value violates {c}"))
                        .unwrap_or_else(|| "Duplicate value".to_string()),
                )
            }
            StoreError::Database(other) => CoreError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Record selection for [`EntityStore::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Ids(Vec<EntityId>),
    /// Owners whose `relation` set contains the id.
    Contains(Relation, EntityId),
    /// Records whose singular `field` equals the id.
    RefersTo(Field, EntityId),
    /// Projects that list the user as a member.
    HasMember(UserId),
}

impl Filter {
    /// Every record of `kind` that belongs to the project.
    pub fn in_project(kind: EntityKind, project_id: EntityId) -> Filter {
        match Field::project_of(kind) {
            Some(field) => Filter::RefersTo(field, project_id),
            None => Filter::Ids(vec![project_id]),
        }
    }

    /// Reject filters that cannot apply to `kind`.
    pub fn check(&self, kind: EntityKind) -> StoreResult<()> {
        let ok = match self {
            Filter::All | Filter::Ids(_) => true,
            Filter::Contains(relation, _) => relation.owner() == kind,
            Filter::RefersTo(field, _) => field.owner() == kind,
            Filter::HasMember(_) => kind == EntityKind::Project,
        };
        if ok {
            Ok(())
        } else {
            Err(StoreError::Unsupported(format!("{self:?} does not apply to {kind}")))
        }
    }

    /// In-memory evaluation, shared by [`MemoryStore`] and tests.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Ids(ids) => ids.contains(&record.id()),
            Filter::Contains(relation, id) => record
                .set(*relation)
                .is_some_and(|members| members.contains(id)),
            Filter::RefersTo(field, id) => record.field(*field) == Some(*id),
            Filter::HasMember(user) => record
                .set(Relation::ProjectUsers)
                .is_some_and(|members| members.contains(user)),
        }
    }
}

pub(crate) fn check_optional_field(field: Field) -> StoreResult<()> {
    if field.is_optional() {
        Ok(())
    } else {
        Err(StoreError::Unsupported(format!(
            "{field:?} is fixed at creation and cannot be reassigned"
        )))
    }
}

/// Persistent storage for all seven entity kinds.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Point lookup.
    async fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record>;

    /// Batch lookup. Ids with no record are skipped.
    async fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<Vec<Record>>;

    async fn find(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Vec<Record>>;

    async fn create(&self, new: NewRecord) -> StoreResult<Record>;

    /// Insert every record or none.
    async fn create_many(&self, new: Vec<NewRecord>) -> StoreResult<Vec<Record>>;

    /// Apply a scalar-field patch.
    async fn update(&self, id: EntityId, patch: RecordPatch) -> StoreResult<Record>;

    /// Delete one record and return it.
    async fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record>;

    /// Delete every listed record that exists. Returns how many were removed.
    async fn delete_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<u64>;

    /// Add `member` to `owner`'s set unless present. Returns whether it was added.
    async fn add_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool>;

    /// Add every absent member in one write.
    async fn add_many_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        members: &[EntityId],
    ) -> StoreResult<()>;

    /// Remove `member` from `owner`'s set. Returns whether it was present.
    async fn remove_from_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool>;

    /// Remove `member` from the set of every owner. Returns the owners changed.
    async fn pull_from_all(&self, relation: Relation, member: EntityId)
        -> StoreResult<Vec<EntityId>>;

    /// Set an optional singular reference and return its previous value.
    async fn replace_singular(
        &self,
        field: Field,
        owner: EntityId,
        value: Option<EntityId>,
    ) -> StoreResult<Option<EntityId>>;

    /// Unset `field` on every record where it equals `value`. Returns the
    /// records changed.
    async fn clear_singular_everywhere(
        &self,
        field: Field,
        value: EntityId,
    ) -> StoreResult<Vec<EntityId>>;

    async fn health_check(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use costume_core::types::new_id;

    #[test]
    fn missing_maps_to_not_found() {
        let id = new_id();
        let err: CoreError = StoreError::missing(EntityKind::Scene, id).into();
        assert_matches!(err, CoreError::NotFound { entity: "Scene", id: got } if got == id);
    }

    #[test]
    fn pool_errors_map_to_store_unavailable() {
        let err: CoreError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert_matches!(err, CoreError::StoreUnavailable(_));
    }

    #[test]
    fn filters_are_checked_against_kind() {
        let id = new_id();
        assert!(Filter::Contains(Relation::CostumeScenes, id)
            .check(EntityKind::Costume)
            .is_ok());
        assert_matches!(
            Filter::Contains(Relation::CostumeScenes, id).check(EntityKind::Scene),
            Err(StoreError::Unsupported(_))
        );
        assert_matches!(
            Filter::HasMember(id).check(EntityKind::Character),
            Err(StoreError::Unsupported(_))
        );
    }

    #[test]
    fn in_project_uses_back_reference() {
        let id = new_id();
        assert_eq!(
            Filter::in_project(EntityKind::Location, id),
            Filter::RefersTo(Field::LocationProject, id)
        );
        assert_eq!(Filter::in_project(EntityKind::Project, id), Filter::Ids(vec![id]));
    }
}
