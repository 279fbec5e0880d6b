//! Costume operations: numbering, scene links, bulk delete.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::numbering::{
    is_costume_number_conflict, next_costume_number, resolve_costume_number,
};
use costume_core::path::EntityPath;
use costume_core::relations::{Field, Relation};
use costume_core::types::{parse_id, EntityId};
use costume_db::models::costume::{Costume, CreateCostume, NewCostume, UpdateCostume};
use costume_db::models::{NewRecord, Record, RecordPatch};
use costume_db::store::expand;
use costume_db::Filter;
use serde_json::Value;

use super::{parse_ids, validate};
use crate::cascade::{cascade_delete, CascadeReport};
use crate::gate::{authorize, Authorized};
use crate::graph;
use crate::{typed, Caller, Engine};

/// Reads of the number set before an omitted number gives up to a writer in
/// another process.
const NUMBERING_ATTEMPTS: usize = 3;

impl Engine {
    async fn authorize_costume(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
    ) -> CoreResult<(Authorized, EntityId)> {
        let path = EntityPath::project(project_id)?
            .character(character_id)?
            .costume(costume_id)?;
        let costume_id = path.costume_id().ok_or_else(|| {
            CoreError::Validation("path does not name a costume".to_string())
        })?;
        let auth = authorize(self.store(), caller, &path).await?;
        Ok((auth, costume_id))
    }

    /// Numbers in use by the character's costumes, optionally ignoring one.
    async fn costume_numbers(
        &self,
        character_id: EntityId,
        except: Option<EntityId>,
    ) -> CoreResult<Vec<i32>> {
        let costumes = self
            .store()
            .find(
                EntityKind::Costume,
                &Filter::RefersTo(Field::CostumeCharacter, character_id),
            )
            .await?;
        costumes
            .into_iter()
            .filter(|c| Some(c.id()) != except)
            .map(|c| typed::<Costume>(c).map(|c| c.costume_number))
            .collect()
    }

    /// Report a number the store rejected as taken, with the next free
    /// number read after the competing write. Other errors pass through.
    async fn number_taken(
        &self,
        character_id: EntityId,
        except: Option<EntityId>,
        number: i32,
        err: CoreError,
    ) -> CoreError {
        if !is_costume_number_conflict(&err) {
            return err;
        }
        match self.costume_numbers(character_id, except).await {
            Ok(numbers) => CoreError::DuplicateSequenceNumber {
                number,
                next_free: next_costume_number(&numbers),
            },
            Err(read_err) => read_err,
        }
    }

    pub async fn list_costumes(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<Vec<Costume>> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let mut costumes = self
            .store()
            .get_many(EntityKind::Costume, &auth.character()?.costumes)
            .await?
            .into_iter()
            .map(typed::<Costume>)
            .collect::<CoreResult<Vec<_>>>()?;
        costumes.sort_by_key(|c| c.costume_number);
        Ok(costumes)
    }

    /// Create a costume under a character. An omitted number becomes the
    /// highest existing number plus one.
    pub async fn create_costume(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        input: CreateCostume,
    ) -> CoreResult<Costume> {
        validate(&input)?;
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;

        let _numbering = self.numbering.lock().await;
        let mut attempt = 0;
        let created = loop {
            attempt += 1;
            let existing = self.costume_numbers(character.id, None).await?;
            let number = resolve_costume_number(&existing, input.costume_number)?;
            let new = NewCostume::from_request(&input, auth.project.id, character.id, number);
            match graph::create_under_parent(
                self.store(),
                Relation::CharacterCostumes,
                character.id,
                vec![NewRecord::Costume(new)],
            )
            .await
            {
                Ok(created) => break created,
                Err(err)
                    if input.costume_number.is_none()
                        && attempt < NUMBERING_ATTEMPTS
                        && is_costume_number_conflict(&err) =>
                {
                    tracing::debug!(
                        character_id = %character.id,
                        number,
                        "Costume number taken, retrying",
                    );
                }
                Err(err) => return Err(self.number_taken(character.id, None, number, err).await),
            }
        };

        let costume = created
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Validation("costume was not created".to_string()))?;
        let costume: Costume = typed(costume)?;
        tracing::info!(
            character_id = %character.id,
            costume_id = %costume.id,
            costume_number = costume.costume_number,
            "Costume created",
        );
        Ok(costume)
    }

    /// A costume with its scenes expanded.
    pub async fn get_costume(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
    ) -> CoreResult<Value> {
        let (_, costume_id) = self
            .authorize_costume(caller, project_id, character_id, costume_id)
            .await?;
        let record = self.store().get(EntityKind::Costume, costume_id).await?;
        Ok(expand(self.store(), &record, &["scenes"]).await?)
    }

    /// Update a costume. A costume may keep its own number; any other number
    /// already used by the character is rejected.
    pub async fn update_costume(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
        input: UpdateCostume,
    ) -> CoreResult<Costume> {
        validate(&input)?;
        let (auth, costume_id) = self
            .authorize_costume(caller, project_id, character_id, costume_id)
            .await?;
        let Some(requested) = input.costume_number else {
            let updated = self
                .store()
                .update(costume_id, RecordPatch::Costume(input))
                .await?;
            return typed(updated);
        };

        let character_id = auth.character()?.id;
        let _numbering = self.numbering.lock().await;
        let others = self.costume_numbers(character_id, Some(costume_id)).await?;
        resolve_costume_number(&others, Some(requested))?;
        match self
            .store()
            .update(costume_id, RecordPatch::Costume(input))
            .await
        {
            Ok(updated) => typed(updated),
            Err(err) => Err(self
                .number_taken(character_id, Some(costume_id), requested, err.into())
                .await),
        }
    }

    pub async fn delete_costume(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
    ) -> CoreResult<CascadeReport> {
        let (_, costume_id) = self
            .authorize_costume(caller, project_id, character_id, costume_id)
            .await?;
        cascade_delete(self.store(), EntityRef::new(EntityKind::Costume, costume_id)).await
    }

    /// Delete every costume of a character, one cascade per costume.
    pub async fn delete_all_costumes(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<Vec<CascadeReport>> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;
        let mut ids: Vec<EntityId> = character.costumes.clone();
        for costume in self
            .store()
            .find(
                EntityKind::Costume,
                &Filter::RefersTo(Field::CostumeCharacter, character.id),
            )
            .await?
        {
            if !ids.contains(&costume.id()) {
                ids.push(costume.id());
            }
        }

        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            let report =
                cascade_delete(self.store(), EntityRef::new(EntityKind::Costume, id)).await?;
            reports.push(report);
        }
        tracing::info!(
            character_id = %character.id,
            deleted = reports.len(),
            "All costumes deleted",
        );
        Ok(reports)
    }

    /// Link a scene of the same project to the costume.
    pub async fn attach_costume_scene(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
        scene_id: &str,
    ) -> CoreResult<Costume> {
        let scene_id = parse_id(scene_id)?;
        self.attach_costume_scenes_parsed(
            caller,
            project_id,
            character_id,
            costume_id,
            &[scene_id],
        )
        .await
    }

    /// Link several scenes at once. All ids are checked before any link is
    /// written.
    pub async fn attach_costume_scenes<S: AsRef<str>>(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
        scene_ids: &[S],
    ) -> CoreResult<Costume> {
        let scene_ids = parse_ids(scene_ids)?;
        self.attach_costume_scenes_parsed(
            caller,
            project_id,
            character_id,
            costume_id,
            &scene_ids,
        )
        .await
    }

    async fn attach_costume_scenes_parsed(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
        scene_ids: &[EntityId],
    ) -> CoreResult<Costume> {
        let (auth, costume_id) = self
            .authorize_costume(caller, project_id, character_id, costume_id)
            .await?;
        if scene_ids.iter().any(|id| !auth.owns_scene(*id)) {
            return Err(CoreError::forbidden());
        }
        for scene_id in scene_ids {
            graph::attach(self.store(), Relation::CostumeScenes, costume_id, *scene_id).await?;
        }
        typed(self.store().get(EntityKind::Costume, costume_id).await?)
    }

    pub async fn detach_costume_scene(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        costume_id: &str,
        scene_id: &str,
    ) -> CoreResult<Costume> {
        let scene_id = parse_id(scene_id)?;
        let (auth, costume_id) = self
            .authorize_costume(caller, project_id, character_id, costume_id)
            .await?;
        if !auth.owns_scene(scene_id) {
            return Err(CoreError::forbidden());
        }
        graph::detach(self.store(), Relation::CostumeScenes, costume_id, scene_id).await?;
        let record: Record = self.store().get(EntityKind::Costume, costume_id).await?;
        typed(record)
    }
}
