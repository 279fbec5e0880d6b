//! Location operations. A scene has at most one location; linking a scene
//! moves it off its previous location.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::path::EntityPath;
use costume_core::relations::{Field, Relation};
use costume_core::types::{parse_id, EntityId};
use costume_db::models::location::{CreateLocation, Location, NewLocation, UpdateLocation};
use costume_db::models::scene::Scene;
use costume_db::models::{NewRecord, RecordPatch};
use costume_db::store::expand;
use serde_json::Value;

use super::validate;
use crate::cascade::{cascade_delete, CascadeReport};
use crate::gate::{authorize, Authorized};
use crate::graph;
use crate::{typed, Caller, Engine};

impl Engine {
    async fn authorize_location(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
    ) -> CoreResult<(Authorized, EntityId)> {
        let path = EntityPath::project(project_id)?.location(location_id)?;
        let auth = authorize(self.store(), caller, &path).await?;
        let location_id = path
            .location_id()
            .ok_or_else(|| CoreError::Validation("path does not name a location".to_string()))?;
        Ok((auth, location_id))
    }

    pub async fn list_locations(
        &self,
        caller: Caller,
        project_id: &str,
    ) -> CoreResult<Vec<Location>> {
        let auth = self.authorize_project(caller, project_id).await?;
        self.store()
            .get_many(EntityKind::Location, &auth.project.locations)
            .await?
            .into_iter()
            .map(typed::<Location>)
            .collect()
    }

    pub async fn create_location(
        &self,
        caller: Caller,
        project_id: &str,
        input: CreateLocation,
    ) -> CoreResult<Location> {
        validate(&input)?;
        let auth = self.authorize_project(caller, project_id).await?;
        let created = graph::create_under_parent(
            self.store(),
            Relation::ProjectLocations,
            auth.project.id,
            vec![NewRecord::Location(NewLocation::from_request(&input, auth.project.id))],
        )
        .await?;
        let location = created
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Validation("location was not created".to_string()))?;
        typed(location)
    }

    /// A location with its scenes expanded.
    pub async fn get_location(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
    ) -> CoreResult<Value> {
        let (_, location_id) = self
            .authorize_location(caller, project_id, location_id)
            .await?;
        let record = self.store().get(EntityKind::Location, location_id).await?;
        Ok(expand(self.store(), &record, &["scenes"]).await?)
    }

    pub async fn update_location(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
        input: UpdateLocation,
    ) -> CoreResult<Location> {
        validate(&input)?;
        let (_, location_id) = self
            .authorize_location(caller, project_id, location_id)
            .await?;
        let updated = self
            .store()
            .update(location_id, RecordPatch::Location(input))
            .await?;
        typed(updated)
    }

    /// Delete a location. Scenes shot there lose their location.
    pub async fn delete_location(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
    ) -> CoreResult<CascadeReport> {
        let (_, location_id) = self
            .authorize_location(caller, project_id, location_id)
            .await?;
        cascade_delete(self.store(), EntityRef::new(EntityKind::Location, location_id)).await
    }

    /// Set the scene's location to this one.
    pub async fn attach_location_scene(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
        scene_id: &str,
    ) -> CoreResult<Scene> {
        let scene_id = parse_id(scene_id)?;
        let (auth, location_id) = self
            .authorize_location(caller, project_id, location_id)
            .await?;
        if !auth.owns_scene(scene_id) {
            return Err(CoreError::forbidden());
        }
        graph::set_singular(self.store(), Field::SceneLocation, scene_id, Some(location_id)).await?;
        typed(self.store().get(EntityKind::Scene, scene_id).await?)
    }

    /// Clear the scene's location if it is this one.
    pub async fn detach_location_scene(
        &self,
        caller: Caller,
        project_id: &str,
        location_id: &str,
        scene_id: &str,
    ) -> CoreResult<Scene> {
        let scene_id = parse_id(scene_id)?;
        let (auth, location_id) = self
            .authorize_location(caller, project_id, location_id)
            .await?;
        if !auth.owns_scene(scene_id) {
            return Err(CoreError::forbidden());
        }
        graph::detach(self.store(), Relation::LocationScenes, location_id, scene_id).await?;
        typed(self.store().get(EntityKind::Scene, scene_id).await?)
    }
}
