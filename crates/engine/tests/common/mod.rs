//! Shared helpers for engine integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use costume_core::types::{new_id, EntityId, UserId};
use costume_db::models::project::CreateProject;
use costume_db::models::{NewRecord, Record, RecordPatch};
use costume_db::{EntityStore, Filter, MemoryStore, StoreError, StoreResult};
use costume_engine::{Caller, Engine};

/// Engine over a fresh in-memory store. The store is returned too so tests
/// can inspect raw records.
pub fn engine() -> (Engine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Engine::new(store.clone()), store)
}

/// A new user and the caller acting as them.
pub fn user() -> (UserId, Caller) {
    let id = new_id();
    (id, Caller::User(id))
}

/// Create a project owned by `caller` and return its id as a path string.
pub async fn project(engine: &Engine, caller: Caller, scenes: i32, characters: i32) -> String {
    engine
        .create_project(
            caller,
            CreateProject {
                title: "Uncle Vanya".into(),
                number_of_scenes: Some(scenes),
                number_of_characters: Some(characters),
                ..Default::default()
            },
        )
        .await
        .expect("create project")
        .id
        .to_string()
}

pub fn s(id: EntityId) -> String {
    id.to_string()
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// A store primitive that [`FlakyStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    AddToSet(Relation),
    AddManyToSet(Relation),
    RemoveFromSet(Relation),
    Delete(EntityKind),
    DeleteMany(EntityKind),
    CreateMany,
    /// The next `find` for the kind returns nothing, as if another writer's
    /// insert landed right after the read.
    StaleFind(EntityKind),
}

/// Delegates to a [`MemoryStore`] except for the primitives marked as
/// failing, which return `StoreError::Unavailable`. A stale find is used up
/// by the call it affects.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    faults: Mutex<HashSet<Fault>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fault: Fault) {
        self.faults.lock().unwrap().insert(fault);
    }

    pub fn heal(&self) {
        self.faults.lock().unwrap().clear();
    }

    fn take(&self, fault: Fault) -> bool {
        self.faults.lock().unwrap().remove(&fault)
    }

    fn check(&self, fault: Fault) -> StoreResult<()> {
        if self.faults.lock().unwrap().contains(&fault) {
            return Err(StoreError::Unavailable(format!("injected {fault:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        self.inner.get(kind, id).await
    }

    async fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<Vec<Record>> {
        self.inner.get_many(kind, ids).await
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Vec<Record>> {
        if self.take(Fault::StaleFind(kind)) {
            return Ok(Vec::new());
        }
        self.inner.find(kind, filter).await
    }

    async fn create(&self, new: NewRecord) -> StoreResult<Record> {
        self.inner.create(new).await
    }

    async fn create_many(&self, new: Vec<NewRecord>) -> StoreResult<Vec<Record>> {
        self.check(Fault::CreateMany)?;
        self.inner.create_many(new).await
    }

    async fn update(&self, id: EntityId, patch: RecordPatch) -> StoreResult<Record> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        self.check(Fault::Delete(kind))?;
        self.inner.delete(kind, id).await
    }

    async fn delete_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<u64> {
        self.check(Fault::DeleteMany(kind))?;
        self.inner.delete_many(kind, ids).await
    }

    async fn add_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        self.check(Fault::AddToSet(relation))?;
        self.inner.add_to_set(relation, owner, member).await
    }

    async fn add_many_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        members: &[EntityId],
    ) -> StoreResult<()> {
        self.check(Fault::AddManyToSet(relation))?;
        self.inner.add_many_to_set(relation, owner, members).await
    }

    async fn remove_from_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        self.check(Fault::RemoveFromSet(relation))?;
        self.inner.remove_from_set(relation, owner, member).await
    }

    async fn pull_from_all(
        &self,
        relation: Relation,
        member: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        self.inner.pull_from_all(relation, member).await
    }

    async fn replace_singular(
        &self,
        field: Field,
        owner: EntityId,
        value: Option<EntityId>,
    ) -> StoreResult<Option<EntityId>> {
        self.inner.replace_singular(field, owner, value).await
    }

    async fn clear_singular_everywhere(
        &self,
        field: Field,
        value: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        self.inner.clear_singular_everywhere(field, value).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }
}
