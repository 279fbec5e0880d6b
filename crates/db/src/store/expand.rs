//! Relationship expansion: replace reference ids with the records they name.
//!
//! Paths are dot-separated relation names starting at the record's kind, e.g.
//! `characters.costumes` on a project or `location` on a scene. A set expands
//! to an array of records, a singular field to one record (or `null`) under
//! the field's name. Unknown names are rejected before anything is loaded.

use std::collections::BTreeMap;

use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use serde_json::Value;

use super::{EntityStore, StoreError, StoreResult};
use crate::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Set(Relation),
    Single(Field),
}

/// Parsed and validated expansion paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExpandTree {
    children: BTreeMap<String, (Step, ExpandTree)>,
}

impl ExpandTree {
    /// Parse `paths` rooted at `kind`.
    pub fn parse<S: AsRef<str>>(kind: EntityKind, paths: &[S]) -> StoreResult<Self> {
        let mut tree = ExpandTree::default();
        for path in paths {
            let path = path.as_ref().trim();
            if path.is_empty() {
                continue;
            }
            tree.insert(kind, path.split('.'))?;
        }
        Ok(tree)
    }

    fn insert<'a>(
        &mut self,
        kind: EntityKind,
        mut names: impl Iterator<Item = &'a str>,
    ) -> StoreResult<()> {
        let Some(name) = names.next() else {
            return Ok(());
        };
        let (step, next_kind) = resolve(kind, name)?;
        let (_, child) = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| (step, ExpandTree::default()));
        child.insert(next_kind, names)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn resolve(kind: EntityKind, name: &str) -> StoreResult<(Step, EntityKind)> {
    if let Some(relation) = Relation::from_name(kind, name) {
        let target = relation.target().ok_or_else(|| {
            StoreError::Unsupported(format!("'{name}' on {kind} cannot be expanded"))
        })?;
        return Ok((Step::Set(relation), target));
    }
    if let Some(field) = Field::from_name(kind, name) {
        return Ok((Step::Single(field), field.target()));
    }
    Err(StoreError::Unsupported(format!(
        "Unknown relation '{name}' on {kind}"
    )))
}

/// Render `record` as JSON with the named references resolved.
pub async fn expand<S: AsRef<str>>(
    store: &dyn EntityStore,
    record: &Record,
    paths: &[S],
) -> StoreResult<Value> {
    let tree = ExpandTree::parse(record.kind(), paths)?;
    expand_tree(store, record, &tree).await
}

/// Expand several records of the same kind with the same paths.
pub async fn expand_all<S: AsRef<str>>(
    store: &dyn EntityStore,
    kind: EntityKind,
    records: &[Record],
    paths: &[S],
) -> StoreResult<Value> {
    let tree = ExpandTree::parse(kind, paths)?;
    let values = try_join_all(records.iter().map(|r| expand_tree(store, r, &tree))).await?;
    Ok(Value::Array(values))
}

fn expand_tree<'a>(
    store: &'a dyn EntityStore,
    record: &'a Record,
    tree: &'a ExpandTree,
) -> BoxFuture<'a, StoreResult<Value>> {
    async move {
        let mut value = record.to_json();
        for (name, (step, subtree)) in &tree.children {
            let expanded = match *step {
                Step::Set(relation) => {
                    let ids = record.set(relation).unwrap_or_default();
                    let target = relation.target().unwrap_or(record.kind());
                    let members = store.get_many(target, ids).await?;
                    let items =
                        try_join_all(members.iter().map(|m| expand_tree(store, m, subtree)))
                            .await?;
                    Value::Array(items)
                }
                Step::Single(field) => match record.field(field) {
                    Some(id) => match store.get(field.target(), id).await {
                        Ok(target) => expand_tree(store, &target, subtree).await?,
                        Err(err) if err.is_missing() => Value::Null,
                        Err(err) => return Err(err),
                    },
                    None => Value::Null,
                },
            };
            if let Value::Object(map) = &mut value {
                map.insert(name.clone(), expanded);
            }
        }
        Ok(value)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_nested_paths() {
        let tree = ExpandTree::parse(EntityKind::Project, &["characters.costumes", "scenes"])
            .unwrap();
        assert_eq!(tree.children.len(), 2);
        let (_, characters) = &tree.children["characters"];
        assert!(characters.children.contains_key("costumes"));
    }

    #[test]
    fn singular_fields_are_expandable() {
        let tree = ExpandTree::parse(EntityKind::Scene, &["location.scenes"]).unwrap();
        let (step, _) = &tree.children["location"];
        assert_eq!(*step, Step::Single(Field::SceneLocation));
    }

    #[test]
    fn unknown_relation_is_rejected() {
        assert_matches!(
            ExpandTree::parse(EntityKind::Location, &["costumes"]),
            Err(StoreError::Unsupported(msg)) if msg.contains("costumes")
        );
        assert_matches!(
            ExpandTree::parse(EntityKind::Project, &["characters.wardrobe"]),
            Err(StoreError::Unsupported(_))
        );
    }

    #[test]
    fn users_cannot_be_expanded() {
        assert_matches!(
            ExpandTree::parse(EntityKind::Project, &["users"]),
            Err(StoreError::Unsupported(_))
        );
    }

    #[test]
    fn blank_paths_are_ignored() {
        assert!(ExpandTree::parse(EntityKind::Project, &["", "  "])
            .unwrap()
            .is_empty());
    }
}
