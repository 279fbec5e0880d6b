//! PostgreSQL [`EntityStore`] built on the repository layer.

use async_trait::async_trait;
use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use costume_core::types::EntityId;
use sqlx::PgPool;

use super::{check_optional_field, EntityStore, Filter, StoreError, StoreResult};
use crate::models::{NewRecord, Record, RecordPatch};
use crate::repositories::{
    self, CharacterRepo, CostumeRepo, ImageRepo, LocationRepo, MeasurementsRepo, ProjectRepo,
    RelationRepo, SceneRepo,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Distinguish "owner missing" from "nothing to do" after a conditional
    /// update touched no row.
    async fn ensure_exists(&self, kind: EntityKind, id: EntityId) -> StoreResult<()> {
        if repositories::exists(&self.pool, kind, id).await? {
            Ok(())
        } else {
            Err(StoreError::missing(kind, id))
        }
    }
}

/// Run `$body` with `$repo` bound to the repository for `$kind` and wrap the
/// typed result back into a [`Record`].
macro_rules! by_kind {
    ($kind:expr, |$repo:ident, $variant:ident| $body:expr) => {
        match $kind {
            EntityKind::Project => {
                use crate::repositories::ProjectRepo as $repo;
                let $variant = Record::Project;
                $body
            }
            EntityKind::Character => {
                use crate::repositories::CharacterRepo as $repo;
                let $variant = Record::Character;
                $body
            }
            EntityKind::Costume => {
                use crate::repositories::CostumeRepo as $repo;
                let $variant = Record::Costume;
                $body
            }
            EntityKind::Scene => {
                use crate::repositories::SceneRepo as $repo;
                let $variant = Record::Scene;
                $body
            }
            EntityKind::Location => {
                use crate::repositories::LocationRepo as $repo;
                let $variant = Record::Location;
                $body
            }
            EntityKind::Measurements => {
                use crate::repositories::MeasurementsRepo as $repo;
                let $variant = Record::Measurements;
                $body
            }
            EntityKind::Image => {
                use crate::repositories::ImageRepo as $repo;
                let $variant = Record::Image;
                $body
            }
        }
    };
}

async fn insert<'e, E>(executor: E, new: &NewRecord) -> Result<Record, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    Ok(match new {
        NewRecord::Project(n) => Record::Project(ProjectRepo::create(executor, n).await?),
        NewRecord::Character(n) => Record::Character(CharacterRepo::create(executor, n).await?),
        NewRecord::Costume(n) => Record::Costume(CostumeRepo::create(executor, n).await?),
        NewRecord::Scene(n) => Record::Scene(SceneRepo::create(executor, n).await?),
        NewRecord::Location(n) => Record::Location(LocationRepo::create(executor, n).await?),
        NewRecord::Measurements(n) => {
            Record::Measurements(MeasurementsRepo::create(executor, n).await?)
        }
        NewRecord::Image(n) => Record::Image(ImageRepo::create(executor, n).await?),
    })
}

#[async_trait]
impl EntityStore for PgStore {
    async fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        let found = by_kind!(kind, |Repo, wrap| Repo::find_by_id(&self.pool, id)
            .await?
            .map(wrap));
        found.ok_or(StoreError::missing(kind, id))
    }

    async fn get_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(kind, &Filter::Ids(ids.to_vec())).await
    }

    async fn find(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Vec<Record>> {
        filter.check(kind)?;
        let records: Vec<Record> = by_kind!(kind, |Repo, wrap| Repo::find(&self.pool, filter)
            .await?
            .into_iter()
            .map(wrap)
            .collect());
        Ok(records)
    }

    async fn create(&self, new: NewRecord) -> StoreResult<Record> {
        Ok(insert(&self.pool, &new).await?)
    }

    async fn create_many(&self, new: Vec<NewRecord>) -> StoreResult<Vec<Record>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(new.len());
        for n in &new {
            created.push(insert(&mut *tx, n).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: EntityId, patch: RecordPatch) -> StoreResult<Record> {
        let kind = patch.kind();
        let updated = match &patch {
            RecordPatch::Project(p) => ProjectRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Project),
            RecordPatch::Character(p) => CharacterRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Character),
            RecordPatch::Costume(p) => CostumeRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Costume),
            RecordPatch::Scene(p) => SceneRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Scene),
            RecordPatch::Location(p) => LocationRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Location),
            RecordPatch::Measurements(p) => MeasurementsRepo::update(&self.pool, id, p)
                .await?
                .map(Record::Measurements),
        };
        updated.ok_or(StoreError::missing(kind, id))
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<Record> {
        let deleted = by_kind!(kind, |Repo, wrap| Repo::delete(&self.pool, id)
            .await?
            .map(wrap));
        deleted.ok_or(StoreError::missing(kind, id))
    }

    async fn delete_many(&self, kind: EntityKind, ids: &[EntityId]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        Ok(repositories::delete_many(&self.pool, kind, ids).await?)
    }

    async fn add_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        if RelationRepo::add(&self.pool, relation, owner, member).await? > 0 {
            return Ok(true);
        }
        self.ensure_exists(relation.owner(), owner).await?;
        Ok(false)
    }

    async fn add_many_to_set(
        &self,
        relation: Relation,
        owner: EntityId,
        members: &[EntityId],
    ) -> StoreResult<()> {
        if RelationRepo::add_many(&self.pool, relation, owner, members).await? {
            Ok(())
        } else {
            Err(StoreError::missing(relation.owner(), owner))
        }
    }

    async fn remove_from_set(
        &self,
        relation: Relation,
        owner: EntityId,
        member: EntityId,
    ) -> StoreResult<bool> {
        if RelationRepo::remove(&self.pool, relation, owner, member).await? > 0 {
            return Ok(true);
        }
        self.ensure_exists(relation.owner(), owner).await?;
        Ok(false)
    }

    async fn pull_from_all(
        &self,
        relation: Relation,
        member: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        Ok(RelationRepo::pull_from_all(&self.pool, relation, member).await?)
    }

    async fn replace_singular(
        &self,
        field: Field,
        owner: EntityId,
        value: Option<EntityId>,
    ) -> StoreResult<Option<EntityId>> {
        check_optional_field(field)?;
        RelationRepo::replace_singular(&self.pool, field, owner, value)
            .await?
            .ok_or(StoreError::missing(field.owner(), owner))
    }

    async fn clear_singular_everywhere(
        &self,
        field: Field,
        value: EntityId,
    ) -> StoreResult<Vec<EntityId>> {
        check_optional_field(field)?;
        Ok(RelationRepo::clear_singular_everywhere(&self.pool, field, value).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
