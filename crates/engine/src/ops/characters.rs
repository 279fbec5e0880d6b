//! Character operations.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::numbering::preallocated_numbers;
use costume_core::path::EntityPath;
use costume_core::relations::Relation;
use costume_db::models::character::{Character, CreateCharacter, NewCharacter, UpdateCharacter};
use costume_db::models::costume::NewCostume;
use costume_db::models::{NewRecord, Record, RecordPatch};
use costume_db::store::expand::{expand, expand_all};
use serde_json::Value;

use super::validate;
use crate::cascade::{cascade_delete, CascadeReport};
use crate::gate::{authorize, Authorized};
use crate::graph;
use crate::{typed, Caller, Engine};

impl Engine {
    pub(crate) async fn authorize_character(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<Authorized> {
        let path = EntityPath::project(project_id)?.character(character_id)?;
        authorize(self.store(), caller, &path).await
    }

    /// Characters of the project, expanded along `expand_paths`.
    pub async fn list_characters(
        &self,
        caller: Caller,
        project_id: &str,
        expand_paths: &[String],
    ) -> CoreResult<Value> {
        let auth = self.authorize_project(caller, project_id).await?;
        let characters = self
            .store()
            .get_many(EntityKind::Character, &auth.project.characters)
            .await?;
        Ok(expand_all(self.store(), EntityKind::Character, &characters, expand_paths).await?)
    }

    /// Create a character and pre-allocate `number_of_costumes` costumes
    /// numbered from 1.
    pub async fn create_character(
        &self,
        caller: Caller,
        project_id: &str,
        input: CreateCharacter,
    ) -> CoreResult<Character> {
        validate(&input)?;
        let auth = self.authorize_project(caller, project_id).await?;
        let project_id = auth.project.id;

        let created = graph::create_under_parent(
            self.store(),
            Relation::ProjectCharacters,
            project_id,
            vec![NewRecord::Character(NewCharacter::from_request(&input, project_id))],
        )
        .await?;
        let character_id = created
            .first()
            .map(Record::id)
            .ok_or_else(|| CoreError::Validation("character was not created".to_string()))?;

        let costumes: Vec<NewRecord> = preallocated_numbers(input.number_of_costumes.unwrap_or(0))
            .map(|n| NewRecord::Costume(NewCostume::placeholder(project_id, character_id, n)))
            .collect();
        let costume_count = costumes.len();
        if let Err(err) = graph::create_under_parent(
            self.store(),
            Relation::CharacterCostumes,
            character_id,
            costumes,
        )
        .await
        {
            cascade_delete(
                self.store(),
                EntityRef::new(EntityKind::Character, character_id),
            )
            .await?;
            return Err(err);
        }

        tracing::info!(
            project_id = %project_id,
            character_id = %character_id,
            costumes = costume_count,
            "Character created",
        );
        typed(self.store().get(EntityKind::Character, character_id).await?)
    }

    pub async fn get_character(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        expand_paths: &[String],
    ) -> CoreResult<Value> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let record: Record = auth.character()?.clone().into();
        Ok(expand(self.store(), &record, expand_paths).await?)
    }

    pub async fn update_character(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        input: UpdateCharacter,
    ) -> CoreResult<Character> {
        validate(&input)?;
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let updated = self
            .store()
            .update(auth.character()?.id, RecordPatch::Character(input))
            .await?;
        typed(updated)
    }

    /// Delete a character with its costumes and measurements.
    pub async fn delete_character(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<CascadeReport> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        cascade_delete(
            self.store(),
            EntityRef::new(EntityKind::Character, auth.character()?.id),
        )
        .await
    }
}
