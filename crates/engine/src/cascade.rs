//! Cascade deletion engine.
//!
//! A delete walks [`CascadeStage`] one step at a time:
//!
//! | Stage               | Work                                                   |
//! |---------------------|--------------------------------------------------------|
//! | `ChildrenResolved`  | load the target and collect every owned descendant     |
//! | `ChildrenPurged`    | delete descendants bottom-up, pulling references to them |
//! | `SelfDeleted`       | delete the target                                      |
//! | `ReferencesDetached`| pull or clear every reference to the target            |
//!
//! Which references exist is read from the relation catalog, so a new
//! relation is covered without touching this module. Descendants of the same
//! kind are independent and purged concurrently.

use std::collections::{BTreeMap, BTreeSet};

use costume_core::cascade::CascadeStage;
use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::relations::{Field, Relation};
use costume_core::types::EntityId;
use costume_db::models::Record;
use costume_db::{EntityStore, Filter, StoreError};
use futures::future::try_join_all;
use serde::Serialize;

/// Descendant kinds in the order they are purged. Leaves first.
const PURGE_ORDER: [EntityKind; 6] = [
    EntityKind::Image,
    EntityKind::Costume,
    EntityKind::Measurements,
    EntityKind::Character,
    EntityKind::Scene,
    EntityKind::Location,
];

/// One reference removed from a surviving record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detachment {
    pub owner: EntityRef,
    /// Name of the set or field that held the reference.
    pub reference: &'static str,
    pub removed: EntityRef,
}

/// Outcome of a completed cascade.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeReport {
    pub target: EntityRef,
    /// Every record deleted, descendants first, the target last.
    pub deleted: Vec<EntityRef>,
    pub detached: Vec<Detachment>,
    pub stage: CascadeStage,
}

impl CascadeReport {
    pub fn deleted_count(&self, kind: EntityKind) -> usize {
        self.deleted.iter().filter(|r| r.kind == kind).count()
    }
}

/// Owned descendants of `kind`: (child kind, owning set on the parent, back
/// reference on the child). Both are consulted so a half-linked child is
/// still found.
fn owned_children(kind: EntityKind) -> &'static [(EntityKind, Option<Relation>, Field)] {
    match kind {
        EntityKind::Project => &[
            (
                EntityKind::Character,
                Some(Relation::ProjectCharacters),
                Field::CharacterProject,
            ),
            (EntityKind::Costume, None, Field::CostumeProject),
            (EntityKind::Measurements, None, Field::MeasurementsProject),
            (EntityKind::Scene, Some(Relation::ProjectScenes), Field::SceneProject),
            (
                EntityKind::Location,
                Some(Relation::ProjectLocations),
                Field::LocationProject,
            ),
            (EntityKind::Image, None, Field::ImageProject),
        ],
        EntityKind::Character => &[
            (EntityKind::Costume, Some(Relation::CharacterCostumes), Field::CostumeCharacter),
            (EntityKind::Measurements, None, Field::MeasurementsCharacter),
        ],
        _ => &[],
    }
}

/// A single delete in progress.
pub struct Cascade<'a> {
    store: &'a dyn EntityStore,
    target: EntityRef,
    stage: CascadeStage,
    children: BTreeMap<EntityKind, Vec<EntityId>>,
    doomed: BTreeSet<EntityId>,
    deleted: Vec<EntityRef>,
    detached: Vec<Detachment>,
}

impl<'a> Cascade<'a> {
    /// Start a cascade for a target the caller is already authorized to
    /// delete.
    pub fn new(store: &'a dyn EntityStore, target: EntityRef) -> Self {
        Self {
            store,
            target,
            stage: CascadeStage::Authorized,
            children: BTreeMap::new(),
            doomed: BTreeSet::new(),
            deleted: Vec::new(),
            detached: Vec::new(),
        }
    }

    pub fn stage(&self) -> CascadeStage {
        self.stage
    }

    /// Descendants collected so far, by kind.
    pub fn children(&self) -> &BTreeMap<EntityKind, Vec<EntityId>> {
        &self.children
    }

    /// Run the next stage. Returns the stage reached.
    pub async fn step(&mut self) -> CoreResult<CascadeStage> {
        let Some(next) = self.stage.next() else {
            return Ok(self.stage);
        };
        match next {
            CascadeStage::ChildrenResolved => self.resolve_children().await?,
            CascadeStage::ChildrenPurged => self.purge_children().await?,
            CascadeStage::SelfDeleted => self.delete_self().await?,
            CascadeStage::ReferencesDetached => {
                let detached = self
                    .detach_references(self.target)
                    .await
                    .map_err(|e| CoreError::cascade(next.as_str(), self.target, e))?;
                self.record_detached(detached);
            }
            CascadeStage::Authorized | CascadeStage::Done => {}
        }
        self.stage = next;
        Ok(next)
    }

    /// Run every remaining stage.
    pub async fn run(mut self) -> CoreResult<CascadeReport> {
        tracing::info!(target_entity = %self.target, "Cascade delete started");
        while !self.stage.is_done() {
            self.step().await?;
        }
        tracing::info!(
            target_entity = %self.target,
            deleted = self.deleted.len(),
            detached = self.detached.len(),
            "Cascade delete finished",
        );
        Ok(CascadeReport {
            target: self.target,
            deleted: self.deleted,
            detached: self.detached,
            stage: self.stage,
        })
    }

    /// Nothing has been written yet, so errors here are returned unchanged.
    async fn resolve_children(&mut self) -> CoreResult<()> {
        let record = self.store.get(self.target.kind, self.target.id).await?;
        self.doomed.insert(self.target.id);

        let mut parents = vec![record];
        while let Some(parent) = parents.pop() {
            for &(kind, set, back_ref) in owned_children(parent.kind()) {
                let mut ids: BTreeSet<EntityId> = set
                    .and_then(|s| parent.set(s))
                    .unwrap_or_default()
                    .iter()
                    .copied()
                    .collect();
                let by_back_ref = self
                    .store
                    .find(kind, &Filter::RefersTo(back_ref, parent.id()))
                    .await?;
                ids.extend(by_back_ref.iter().map(Record::id));

                let fresh: Vec<EntityId> = ids
                    .into_iter()
                    .filter(|id| self.doomed.insert(*id))
                    .collect();
                if fresh.is_empty() {
                    continue;
                }
                if !owned_children(kind).is_empty() {
                    parents.extend(self.store.get_many(kind, &fresh).await?);
                }
                self.children.entry(kind).or_default().extend(fresh);
            }
        }

        tracing::debug!(
            target_entity = %self.target,
            children = self.doomed.len() - 1,
            "Cascade children resolved",
        );
        Ok(())
    }

    async fn purge_children(&mut self) -> CoreResult<()> {
        for kind in PURGE_ORDER {
            let Some(ids) = self.children.get(&kind).cloned() else {
                continue;
            };
            let this = &*self;
            let purged = try_join_all(ids.iter().map(|&id| this.purge_one(kind, id))).await?;
            for (deleted, detached) in purged {
                if let Some(entity) = deleted {
                    self.deleted.push(entity);
                }
                self.record_detached(detached);
            }
        }
        Ok(())
    }

    /// Delete one descendant and pull every reference to it.
    async fn purge_one(
        &self,
        kind: EntityKind,
        id: EntityId,
    ) -> CoreResult<(Option<EntityRef>, Vec<Detachment>)> {
        let entity = EntityRef::new(kind, id);
        let stage = CascadeStage::ChildrenPurged.as_str();
        let deleted = match self.store.delete(kind, id).await {
            Ok(_) => Some(entity),
            Err(err) if err.is_missing() => None,
            Err(err) => return Err(CoreError::cascade(stage, entity, err)),
        };
        let detached = self
            .detach_references(entity)
            .await
            .map_err(|e| CoreError::cascade(stage, entity, e))?;
        Ok((deleted, detached))
    }

    async fn delete_self(&mut self) -> CoreResult<()> {
        match self.store.delete(self.target.kind, self.target.id).await {
            Ok(_) => {}
            Err(err) if err.is_missing() => {}
            Err(err) => {
                return Err(CoreError::cascade(
                    CascadeStage::SelfDeleted.as_str(),
                    self.target,
                    err,
                ))
            }
        }
        self.deleted.push(self.target);
        Ok(())
    }

    /// Pull `entity` from every set that can hold its kind and clear every
    /// optional field pointing at it.
    async fn detach_references(&self, entity: EntityRef) -> Result<Vec<Detachment>, StoreError> {
        let mut detached = Vec::new();
        for relation in Relation::incoming(entity.kind) {
            for owner in self.store.pull_from_all(relation, entity.id).await? {
                detached.push(Detachment {
                    owner: EntityRef::new(relation.owner(), owner),
                    reference: relation.name(),
                    removed: entity,
                });
            }
        }
        for field in Field::incoming_optional(entity.kind) {
            for owner in self
                .store
                .clear_singular_everywhere(field, entity.id)
                .await?
            {
                detached.push(Detachment {
                    owner: EntityRef::new(field.owner(), owner),
                    reference: field.name(),
                    removed: entity,
                });
            }
        }
        Ok(detached)
    }

    /// Keep only detachments from records that survive the cascade.
    fn record_detached(&mut self, detached: Vec<Detachment>) {
        self.detached.extend(
            detached
                .into_iter()
                .filter(|d| !self.doomed.contains(&d.owner.id)),
        );
    }
}

/// Delete `target` and everything it owns.
pub async fn cascade_delete(
    store: &dyn EntityStore,
    target: EntityRef,
) -> CoreResult<CascadeReport> {
    Cascade::new(store, target).run().await
}
