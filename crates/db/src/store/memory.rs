//! In-memory [`EntityStore`] used by tests and by the service when no
//! database is configured.
//!
//! All records live in one map guarded by a `tokio::sync::RwLock`. Each
//! primitive takes the write lock once, so it is atomic with respect to every
//! other call on the same store. Inserts and updates enforce the same unique
//! keys as the PostgreSQL indexes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use costume_core::kinds::EntityKind;
use costume_core::numbering::{COSTUME_NUMBER_CONSTRAINT, MEASUREMENTS_CHARACTER_CONSTRAINT};
use costume_core::relations::{Field, Relation};
use costume_core::types::{new_id, EntityId};
use tokio::sync::RwLock;

use super::{check_optional_field, EntityStore, Filter, StoreError, StoreResult};
use crate::models::{NewRecord, Record, RecordPatch};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<EntityId, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records of `kind`.
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.kind() == kind)
            .count()
    }

    /// Every stored record, in no particular order.
    pub async fn snapshot(&self) -> Vec<Record> {
        self.records.read().await.values().cloned().collect()
    }
}

fn lookup<'a>(
    records: &'a mut HashMap<EntityId, Record>,
    kind: EntityKind,
    id: EntityId,
) -> StoreResult<&'a mut Record> {
    records
        .get_mut(&id)
        .filter(|r| r.kind() == kind)
        .ok_or(StoreError::missing(kind, id))
}

/// The unique index a record falls under, with its key.
fn unique_key(record: &Record) -> Option<(&'static str, EntityId, i32)> {
    match record {
        Record::Costume(c) => Some((COSTUME_NUMBER_CONSTRAINT, c.character_id, c.costume_number)),
        Record::Measurements(m) => Some((MEASUREMENTS_CHARACTER_CONSTRAINT, m.character_id, 0)),
        _ => None,
    }
}

/// Reject `candidate` if another record already holds its unique key.
fn check_unique<'a>(
    existing: impl IntoIterator<Item = &'a Record>,
    candidate: &Record,
) -> StoreResult<()> {
    let Some(key) = unique_key(candidate) else {
        return Ok(());
    };
    let taken = existing
        .into_iter()
        .any(|r| r.id() != candidate.id() && unique_key(r) == Some(key));
    if taken {
        return Err(StoreError::Conflict(format!(
            "Duplicate value violates {}",
            key.0
        )));
    }
    Ok(())
}

fn sync_counter(members: &[EntityId], counter: Option<&mut i32>) {
    if let Some(counter) = counter {
        *counter = i32::try_from(members.len()).unwrap_or(i32::MAX);
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        self.records
            .read()
            .await
            .get(&id)
            .filter(|r| r.kind() == kind)
            .cloned()
            .ok_or(StoreError::missing(kind, id))
    }

    async fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<Vec<Record>> {
        let records = self.records.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| records.get(id))
            .filter(|r| r.kind() == kind)
            .cloned()
            .collect())
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Vec<Record>> {
        filter.check(kind)?;
        let records = self.records.read().await;
        let mut found: Vec<Record> = records
            .values()
            .filter(|r| r.kind() == kind && filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(found)
    }

    async fn create(&self, new: NewRecord) -> StoreResult<Record> {
        let record = new.into_record(new_id(), Utc::now());
        let mut records = self.records.write().await;
        check_unique(records.values(), &record)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn create_many(&self, new: Vec<NewRecord>) -> StoreResult<Vec<Record>> {
        let now = Utc::now();
        let created: Vec<Record> = new
            .into_iter()
            .map(|n| n.into_record(new_id(), now))
            .collect();
        let mut records = self.records.write().await;
        for (i, record) in created.iter().enumerate() {
            check_unique(records.values().chain(&created[..i]), record)?;
        }
        for record in &created {
            records.insert(record.id(), record.clone());
        }
        Ok(created)
    }

    async fn update(&self, id: EntityId, patch: RecordPatch) -> StoreResult<Record> {
        let mut records = self.records.write().await;
        let mut updated = lookup(&mut records, patch.kind(), id)?.clone();
        patch.apply(&mut updated);
        updated.touch(Utc::now());
        check_unique(records.values(), &updated)?;
        records.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        let mut records = self.records.write().await;
        lookup(&mut records, kind, id)?;
        records.remove(&id).ok_or(StoreError::missing(kind, id))
    }

    async fn delete_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        let mut removed = 0;
        for id in ids {
            if records.get(id).is_some_and(|r| r.kind() == kind) {
                records.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn add_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let record = lookup(&mut records, relation.owner(), owner)?;
        let (members, counter) = record
            .set_mut(relation)
            .ok_or_else(|| StoreError::Unsupported(format!("{relation:?}")))?;
        if members.contains(&member) {
            return Ok(false);
        }
        members.push(member);
        sync_counter(members, counter);
        record.touch(Utc::now());
        Ok(true)
    }

    async fn add_many_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        new_members: &[EntityId],
    ) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = lookup(&mut records, relation.owner(), owner)?;
        let (members, counter) = record
            .set_mut(relation)
            .ok_or_else(|| StoreError::Unsupported(format!("{relation:?}")))?;
        for member in new_members {
            if !members.contains(member) {
                members.push(*member);
            }
        }
        sync_counter(members, counter);
        record.touch(Utc::now());
        Ok(())
    }

    async fn remove_from_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let record = lookup(&mut records, relation.owner(), owner)?;
        let (members, counter) = record
            .set_mut(relation)
            .ok_or_else(|| StoreError::Unsupported(format!("{relation:?}")))?;
        let before = members.len();
        members.retain(|m| *m != member);
        if members.len() == before {
            return Ok(false);
        }
        sync_counter(members, counter);
        record.touch(Utc::now());
        Ok(true)
    }

    async fn pull_from_all(
        &self,
        relation: Relation,
        member: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let mut changed = Vec::new();
        for record in records.values_mut() {
            if record.kind() != relation.owner() {
                continue;
            }
            let Some((members, counter)) = record.set_mut(relation) else {
                continue;
            };
            if !members.contains(&member) {
                continue;
            }
            members.retain(|m| *m != member);
            sync_counter(members, counter);
            record.touch(now);
            changed.push(record.id());
        }
        changed.sort();
        Ok(changed)
    }

    async fn replace_singular(
        &self,
        field: Field,
        owner: EntityId,
        value: Option<EntityId>,
    ) -> StoreResult<Option<EntityId>> {
        check_optional_field(field)?;
        let mut records = self.records.write().await;
        let record = lookup(&mut records, field.owner(), owner)?;
        let slot = record
            .optional_field_mut(field)
            .ok_or_else(|| StoreError::Unsupported(format!("{field:?}")))?;
        let previous = std::mem::replace(slot, value);
        record.touch(Utc::now());
        Ok(previous)
    }

    async fn clear_singular_everywhere(
        &self,
        field: Field,
        value: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        check_optional_field(field)?;
        let now = Utc::now();
        let mut records = self.records.write().await;
        let mut changed = Vec::new();
        for record in records.values_mut() {
            if record.kind() != field.owner() {
                continue;
            }
            let Some(slot) = record.optional_field_mut(field) else {
                continue;
            };
            if *slot == Some(value) {
                *slot = None;
                record.touch(now);
                changed.push(record.id());
            }
        }
        changed.sort();
        Ok(changed)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
