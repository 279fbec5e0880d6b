//! Measurements: at most one record per character.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::relations::Field;
use costume_core::types::EntityId;
use costume_db::models::measurements::{
    Measurements, MeasurementsInput, NewMeasurements, UpdateMeasurements,
};
use costume_db::models::{NewRecord, RecordPatch};
use costume_db::Filter;

use super::validate;
use crate::cascade::{cascade_delete, CascadeReport};
use crate::graph;
use crate::{typed, Caller, Engine};

fn no_measurements(character_id: EntityId) -> CoreError {
    CoreError::NotLinked {
        entity: EntityKind::Measurements.name(),
        parent: EntityRef::new(EntityKind::Character, character_id),
    }
}

impl Engine {
    /// The character's current measurements id, following the character's
    /// field first and the back-reference second.
    async fn measurements_of(
        &self,
        character_id: EntityId,
        linked: Option<EntityId>,
    ) -> CoreResult<Option<EntityId>> {
        if linked.is_some() {
            return Ok(linked);
        }
        let found = self
            .store()
            .find(
                EntityKind::Measurements,
                &Filter::RefersTo(Field::MeasurementsCharacter, character_id),
            )
            .await?;
        Ok(found.first().map(|m| m.id()))
    }

    pub async fn get_measurements(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<Measurements> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;
        let id = self
            .measurements_of(character.id, character.measurements_id)
            .await?
            .ok_or_else(|| no_measurements(character.id))?;
        typed(self.store().get(EntityKind::Measurements, id).await?)
    }

    /// Create the character's measurements, replacing (and deleting) any
    /// existing record.
    pub async fn put_measurements(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        input: MeasurementsInput,
    ) -> CoreResult<Measurements> {
        validate(&input)?;
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;

        if let Some(old) = self
            .measurements_of(character.id, character.measurements_id)
            .await?
        {
            cascade_delete(self.store(), EntityRef::new(EntityKind::Measurements, old)).await?;
        }

        let created = self
            .store()
            .create(NewRecord::Measurements(NewMeasurements {
                project_id: auth.project.id,
                character_id: character.id,
                values: input,
            }))
            .await?;
        let measurements_id = created.id();

        if let Err(err) = graph::set_singular(
            self.store(),
            Field::CharacterMeasurements,
            character.id,
            Some(measurements_id),
        )
        .await
        {
            return match self
                .store()
                .delete(EntityKind::Measurements, measurements_id)
                .await
            {
                Ok(_) => Err(err),
                Err(cleanup) => Err(CoreError::cascade(
                    "put_measurements",
                    EntityRef::new(EntityKind::Measurements, measurements_id),
                    format!("{err}; cleanup failed: {cleanup}"),
                )),
            };
        }

        tracing::info!(
            character_id = %character.id,
            measurements_id = %measurements_id,
            "Measurements stored",
        );
        typed(created)
    }

    pub async fn update_measurements(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
        input: UpdateMeasurements,
    ) -> CoreResult<Measurements> {
        validate(&input)?;
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;
        let id = self
            .measurements_of(character.id, character.measurements_id)
            .await?
            .ok_or_else(|| no_measurements(character.id))?;
        let updated = self
            .store()
            .update(id, RecordPatch::Measurements(input))
            .await?;
        typed(updated)
    }

    pub async fn delete_measurements(
        &self,
        caller: Caller,
        project_id: &str,
        character_id: &str,
    ) -> CoreResult<CascadeReport> {
        let auth = self.authorize_character(caller, project_id, character_id).await?;
        let character = auth.character()?;
        let id = self
            .measurements_of(character.id, character.measurements_id)
            .await?
            .ok_or_else(|| no_measurements(character.id))?;
        cascade_delete(self.store(), EntityRef::new(EntityKind::Measurements, id)).await
    }
}
