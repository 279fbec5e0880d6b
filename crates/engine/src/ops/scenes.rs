//! Scene operations, search and character links.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::path::EntityPath;
use costume_core::relations::Relation;
use costume_core::search::{duplicate_numbers, scene_matches};
use costume_core::types::{parse_id, EntityId};
use costume_db::models::scene::{CreateScene, NewScene, Scene, UpdateScene};
use costume_db::models::{NewRecord, Record, RecordPatch};
use costume_db::store::expand;
use serde_json::Value;

use super::validate;
use crate::cascade::{cascade_delete, CascadeReport};
use crate::gate::authorize;
use crate::graph;
use crate::{typed, Caller, Engine};

impl Engine {
    async fn authorize_scene(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
    ) -> CoreResult<EntityId> {
        let path = EntityPath::project(project_id)?.scene(scene_id)?;
        authorize(self.store(), caller, &path).await?;
        path.scene_id()
            .ok_or_else(|| CoreError::Validation("path does not name a scene".to_string()))
    }

    async fn project_scenes(&self, caller: Caller, project_id: &str) -> CoreResult<Vec<Scene>> {
        let auth = self.authorize_project(caller, project_id).await?;
        self.store()
            .get_many(EntityKind::Scene, &auth.project.scenes)
            .await?
            .into_iter()
            .map(typed::<Scene>)
            .collect()
    }

    pub async fn list_scenes(&self, caller: Caller, project_id: &str) -> CoreResult<Vec<Scene>> {
        self.project_scenes(caller, project_id).await
    }

    /// Scenes whose description or time of day contains `q`, ignoring case.
    pub async fn search_scenes(
        &self,
        caller: Caller,
        project_id: &str,
        q: &str,
    ) -> CoreResult<Vec<Scene>> {
        let scenes = self.project_scenes(caller, project_id).await?;
        Ok(scenes
            .into_iter()
            .filter(|s| scene_matches(s.description.as_deref(), s.time_of_day.as_deref(), q))
            .collect())
    }

    /// Scene numbers used by more than one scene of the project.
    pub async fn duplicate_scene_numbers(
        &self,
        caller: Caller,
        project_id: &str,
    ) -> CoreResult<Vec<String>> {
        let scenes = self.project_scenes(caller, project_id).await?;
        Ok(duplicate_numbers(
            scenes.iter().filter_map(|s| s.scene_number.as_deref()),
        ))
    }

    pub async fn create_scene(
        &self,
        caller: Caller,
        project_id: &str,
        input: CreateScene,
    ) -> CoreResult<Scene> {
        validate(&input)?;
        let auth = self.authorize_project(caller, project_id).await?;
        let created = graph::create_under_parent(
            self.store(),
            Relation::ProjectScenes,
            auth.project.id,
            vec![NewRecord::Scene(NewScene::from_request(&input, auth.project.id))],
        )
        .await?;
        let scene = created
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Validation("scene was not created".to_string()))?;
        typed(scene)
    }

    pub async fn get_scene(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
        expand_paths: &[String],
    ) -> CoreResult<Value> {
        let scene_id = self.authorize_scene(caller, project_id, scene_id).await?;
        let record = self.store().get(EntityKind::Scene, scene_id).await?;
        Ok(expand(self.store(), &record, expand_paths).await?)
    }

    pub async fn update_scene(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
        input: UpdateScene,
    ) -> CoreResult<Scene> {
        validate(&input)?;
        let scene_id = self.authorize_scene(caller, project_id, scene_id).await?;
        let updated = self
            .store()
            .update(scene_id, RecordPatch::Scene(input))
            .await?;
        typed(updated)
    }

    /// Delete a scene and unlink it from costumes, characters, its location
    /// and the project.
    pub async fn delete_scene(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
    ) -> CoreResult<CascadeReport> {
        let scene_id = self.authorize_scene(caller, project_id, scene_id).await?;
        cascade_delete(self.store(), EntityRef::new(EntityKind::Scene, scene_id)).await
    }

    /// Link a character of the same project to the scene.
    pub async fn attach_scene_character(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
        character_id: &str,
    ) -> CoreResult<Scene> {
        self.link_scene_character(caller, project_id, scene_id, character_id, true)
            .await
    }

    pub async fn detach_scene_character(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
        character_id: &str,
    ) -> CoreResult<Scene> {
        self.link_scene_character(caller, project_id, scene_id, character_id, false)
            .await
    }

    async fn link_scene_character(
        &self,
        caller: Caller,
        project_id: &str,
        scene_id: &str,
        character_id: &str,
        attach: bool,
    ) -> CoreResult<Scene> {
        let character_id = parse_id(character_id)?;
        let path = EntityPath::project(project_id)?.scene(scene_id)?;
        let auth = authorize(self.store(), caller, &path).await?;
        if !auth.owns_character(character_id) {
            return Err(CoreError::forbidden());
        }
        let scene_id = path
            .scene_id()
            .ok_or_else(|| CoreError::Validation("path does not name a scene".to_string()))?;

        if attach {
            graph::attach(self.store(), Relation::SceneCharacters, scene_id, character_id).await?;
        } else {
            graph::detach(self.store(), Relation::SceneCharacters, scene_id, character_id).await?;
        }
        let record: Record = self.store().get(EntityKind::Scene, scene_id).await?;
        typed(record)
    }
}
