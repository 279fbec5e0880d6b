//! Reference graph maintainer.
//!
//! The only code that changes reference sets or singular references. Every
//! function keeps both sides of a relation in step:
//!
//! - both ends are checked to exist before anything is written;
//! - the owner side is written first, then the target side;
//! - if the target write fails, the owner write is reverted. If the revert
//!   also fails the error is `CascadeFailed` naming the step and record.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::relations::{Field, Inverse, Relation};
use costume_core::types::EntityId;
use costume_db::models::{NewRecord, Record};
use costume_db::{EntityStore, StoreError};

async fn ensure_exists(store: &dyn EntityStore, kind: EntityKind, id: EntityId) -> CoreResult<()> {
    store.get(kind, id).await?;
    Ok(())
}

fn target_kind(relation: Relation) -> CoreResult<EntityKind> {
    relation.target().ok_or_else(|| {
        CoreError::Validation(format!("{relation:?} does not point at stored records"))
    })
}

/// Undo a completed first step after the second step failed.
///
/// Returns the original error if the undo succeeds, `CascadeFailed` if not.
async fn compensate<F>(stage: &str, entity: EntityRef, original: StoreError, undo: F) -> CoreError
where
    F: std::future::Future<Output = Result<(), StoreError>>,
{
    match undo.await {
        Ok(()) => {
            tracing::warn!(stage, entity = %entity, error = %original, "Reverted partial write");
            original.into()
        }
        Err(undo_err) => {
            tracing::error!(
                stage,
                entity = %entity,
                error = %original,
                undo_error = %undo_err,
                "Failed to revert partial write",
            );
            CoreError::cascade(
                stage,
                entity,
                format!("{original}; revert failed: {undo_err}"),
            )
        }
    }
}

/// Add `target` to `owner`'s `relation` set and `owner` to the inverse.
///
/// Attaching a pair that is already linked changes nothing. Returns whether
/// either side changed.
pub async fn attach(
    store: &dyn EntityStore,
    relation: Relation,
    owner: EntityId,
    target: EntityId,
) -> CoreResult<bool> {
    let inverse = match relation.inverse() {
        Inverse::None => {
            ensure_exists(store, relation.owner(), owner).await?;
            if let Some(kind) = relation.target() {
                ensure_exists(store, kind, target).await?;
            }
            return Ok(store.add_to_set(relation, owner, target).await?);
        }
        Inverse::Field(field) if field.is_optional() => {
            let previous = set_singular(store, field, target, Some(owner)).await?;
            return Ok(previous != Some(owner));
        }
        Inverse::Field(_) => {
            return Err(CoreError::Validation(format!(
                "{relation:?} is fixed when the child is created"
            )));
        }
        Inverse::Set(inverse) => inverse,
    };

    ensure_exists(store, relation.owner(), owner).await?;
    ensure_exists(store, target_kind(relation)?, target).await?;

    let added_owner = store.add_to_set(relation, owner, target).await?;
    match store.add_to_set(inverse, target, owner).await {
        Ok(added_target) => Ok(added_owner || added_target),
        Err(err) if added_owner => Err(compensate(
            "attach",
            EntityRef::new(relation.owner(), owner),
            err,
            async {
                store.remove_from_set(relation, owner, target).await?;
                Ok(())
            },
        )
        .await),
        Err(err) => Err(err.into()),
    }
}

/// Remove the link between `owner` and `target` on both sides. Absent links
/// are a no-op. Returns whether either side changed.
pub async fn detach(
    store: &dyn EntityStore,
    relation: Relation,
    owner: EntityId,
    target: EntityId,
) -> CoreResult<bool> {
    let inverse = match relation.inverse() {
        Inverse::None => {
            ensure_exists(store, relation.owner(), owner).await?;
            return Ok(store.remove_from_set(relation, owner, target).await?);
        }
        Inverse::Field(field) if field.is_optional() => {
            ensure_exists(store, relation.owner(), owner).await?;
            let child = store.get(field.owner(), target).await?;
            if child.field(field) != Some(owner) {
                return Ok(false);
            }
            set_singular(store, field, target, None).await?;
            return Ok(true);
        }
        Inverse::Field(_) => {
            return Err(CoreError::Validation(format!(
                "{relation:?} only changes when the child is deleted"
            )));
        }
        Inverse::Set(inverse) => inverse,
    };

    ensure_exists(store, relation.owner(), owner).await?;
    ensure_exists(store, target_kind(relation)?, target).await?;

    let removed_owner = store.remove_from_set(relation, owner, target).await?;
    match store.remove_from_set(inverse, target, owner).await {
        Ok(removed_target) => Ok(removed_owner || removed_target),
        Err(err) if removed_owner => Err(compensate(
            "detach",
            EntityRef::new(relation.owner(), owner),
            err,
            async {
                store.add_to_set(relation, owner, target).await?;
                Ok(())
            },
        )
        .await),
        Err(err) => Err(err.into()),
    }
}

/// Replace an optional singular reference and keep the target's back-set in
/// step. Returns the previous value.
pub async fn set_singular(
    store: &dyn EntityStore,
    field: Field,
    owner: EntityId,
    value: Option<EntityId>,
) -> CoreResult<Option<EntityId>> {
    if !field.is_optional() {
        return Err(CoreError::Validation(format!(
            "{field:?} is fixed when the record is created"
        )));
    }
    ensure_exists(store, field.owner(), owner).await?;
    if let Some(target) = value {
        ensure_exists(store, field.target(), target).await?;
    }

    let previous = store.replace_singular(field, owner, value).await?;
    let Inverse::Set(back) = field.inverse() else {
        return Ok(previous);
    };
    if previous == value {
        return Ok(previous);
    }

    if let Some(old) = previous {
        match store.remove_from_set(back, old, owner).await {
            Ok(_) => {}
            // The previous target is already gone; nothing points back.
            Err(err) if err.is_missing() => {}
            Err(err) => {
                return Err(compensate(
                    "set_singular",
                    EntityRef::new(field.owner(), owner),
                    err,
                    async {
                        store.replace_singular(field, owner, previous).await?;
                        Ok(())
                    },
                )
                .await);
            }
        }
    }

    if let Some(new) = value {
        if let Err(err) = store.add_to_set(back, new, owner).await {
            return Err(compensate(
                "set_singular",
                EntityRef::new(field.owner(), owner),
                err,
                async {
                    store.replace_singular(field, owner, previous).await?;
                    if let Some(old) = previous {
                        match store.add_to_set(back, old, owner).await {
                            Ok(_) => {}
                            Err(e) if e.is_missing() => {}
                            Err(e) => return Err(e),
                        }
                    }
                    Ok(())
                },
            )
            .await);
        }
    }

    Ok(previous)
}

/// Create `records` as children of `parent` and add them all to `relation`.
///
/// The children are inserted all-or-nothing, then added to the parent's set
/// (and its counter) in one write. If that write fails the children are
/// deleted again.
pub async fn create_under_parent(
    store: &dyn EntityStore,
    relation: Relation,
    parent: EntityId,
    records: Vec<NewRecord>,
) -> CoreResult<Vec<Record>> {
    let child_kind = target_kind(relation)?;
    if !relation.is_owning() {
        return Err(CoreError::Validation(format!(
            "{relation:?} does not own its members"
        )));
    }
    if let Some(bad) = records.iter().find(|r| r.kind() != child_kind) {
        return Err(CoreError::Validation(format!(
            "cannot create a {} under {relation:?}",
            bad.kind()
        )));
    }
    if records.is_empty() {
        return Ok(Vec::new());
    }
    ensure_exists(store, relation.owner(), parent).await?;

    let created = store.create_many(records).await?;
    let ids: Vec<EntityId> = created.iter().map(Record::id).collect();

    if let Err(err) = store.add_many_to_set(relation, parent, &ids).await {
        return Err(compensate(
            "create_under_parent",
            EntityRef::new(relation.owner(), parent),
            err,
            async {
                store.delete_many(child_kind, &ids).await?;
                Ok(())
            },
        )
        .await);
    }

    tracing::debug!(
        parent = %EntityRef::new(relation.owner(), parent),
        relation = relation.name(),
        count = ids.len(),
        "Created children",
    );
    Ok(created)
}
