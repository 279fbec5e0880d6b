//! Graph consistency check for one project.
//!
//! Walks every record that belongs to the project and reports each place
//! where the two sides of a relation disagree, a counter differs from the
//! size of its set, or a reference names a record that is not part of the
//! project.

use std::collections::HashMap;

use costume_core::error::CoreResult;
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::relations::{Field, Inverse, Relation};
use costume_core::types::EntityId;
use costume_db::models::Record;
use costume_db::{EntityStore, Filter};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A stored counter differs from the size of its set.
    CounterMismatch {
        entity: EntityRef,
        counter: &'static str,
        stored: i32,
        actual: usize,
    },
    /// `owner` references `member` but `member` does not reference back.
    MissingInverse {
        owner: EntityRef,
        reference: &'static str,
        member: EntityRef,
    },
    /// `owner` references an id that is not a record of this project.
    Dangling {
        owner: EntityRef,
        reference: &'static str,
        member: EntityId,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub project_id: EntityId,
    pub records_checked: usize,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check every relation among the records of `project_id`.
pub async fn check_project(
    store: &dyn EntityStore,
    project_id: EntityId,
) -> CoreResult<IntegrityReport> {
    let mut records: HashMap<EntityId, Record> = HashMap::new();
    for kind in EntityKind::ALL {
        for record in store
            .find(kind, &Filter::in_project(kind, project_id))
            .await?
        {
            records.insert(record.id(), record);
        }
    }
    if !records.contains_key(&project_id) {
        store.get(EntityKind::Project, project_id).await?;
    }

    let mut violations = Vec::new();
    let mut sorted: Vec<&Record> = records.values().collect();
    sorted.sort_by_key(|r| (r.kind(), r.id()));

    for record in &sorted {
        let owner = EntityRef::new(record.kind(), record.id());
        for relation in Relation::ALL.into_iter().filter(|r| r.owner() == record.kind()) {
            check_set(record, owner, relation, &records, &mut violations);
        }
        for field in Field::ALL.into_iter().filter(|f| f.owner() == record.kind()) {
            check_field(record, owner, field, &records, &mut violations);
        }
    }

    if !violations.is_empty() {
        tracing::warn!(
            project_id = %project_id,
            violations = violations.len(),
            "Integrity check found violations",
        );
    }

    Ok(IntegrityReport {
        project_id,
        records_checked: sorted.len(),
        violations,
    })
}

fn check_set(
    record: &Record,
    owner: EntityRef,
    relation: Relation,
    records: &HashMap<EntityId, Record>,
    violations: &mut Vec<Violation>,
) {
    let members = record.set(relation).unwrap_or_default();

    if let (Some(counter), Some(stored)) = (relation.counter(), record.counter(relation)) {
        if usize::try_from(stored).ok() != Some(members.len()) {
            violations.push(Violation::CounterMismatch {
                entity: owner,
                counter,
                stored,
                actual: members.len(),
            });
        }
    }

    let Some(target_kind) = relation.target() else {
        return;
    };
    for &member_id in members {
        let Some(member) = records.get(&member_id).filter(|m| m.kind() == target_kind) else {
            violations.push(Violation::Dangling {
                owner,
                reference: relation.name(),
                member: member_id,
            });
            continue;
        };
        let points_back = match relation.inverse() {
            Inverse::Set(inverse) => member
                .set(inverse)
                .is_some_and(|s| s.contains(&owner.id)),
            Inverse::Field(field) => member.field(field) == Some(owner.id),
            Inverse::None => true,
        };
        if !points_back {
            violations.push(Violation::MissingInverse {
                owner,
                reference: relation.name(),
                member: EntityRef::new(target_kind, member_id),
            });
        }
    }
}

fn check_field(
    record: &Record,
    owner: EntityRef,
    field: Field,
    records: &HashMap<EntityId, Record>,
    violations: &mut Vec<Violation>,
) {
    let Some(target_id) = record.field(field) else {
        return;
    };
    let Some(target) = records.get(&target_id).filter(|t| t.kind() == field.target()) else {
        violations.push(Violation::Dangling {
            owner,
            reference: field.name(),
            member: target_id,
        });
        return;
    };
    let points_back = match field.inverse() {
        Inverse::Set(back) => target.set(back).is_some_and(|s| s.contains(&owner.id)),
        Inverse::Field(back) => target.field(back) == Some(owner.id),
        Inverse::None => true,
    };
    if !points_back {
        violations.push(Violation::MissingInverse {
            owner,
            reference: field.name(),
            member: EntityRef::new(field.target(), target_id),
        });
    }
}
