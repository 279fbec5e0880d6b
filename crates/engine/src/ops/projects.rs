//! Project operations, membership and the integrity check.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::path::EntityPath;
use costume_core::relations::Relation;
use costume_core::types::{parse_id, EntityId};
use costume_db::models::character::NewCharacter;
use costume_db::models::project::{CreateProject, NewProject, Project, UpdateProject};
use costume_db::models::scene::NewScene;
use costume_db::models::{NewRecord, Record, RecordPatch};
use costume_db::store::expand;
use costume_db::Filter;
use serde_json::Value;

use super::validate;
use crate::cascade::{cascade_delete, CascadeReport};
use crate::gate::{authorize, Authorized};
use crate::graph;
use crate::integrity::{check_project, IntegrityReport};
use crate::{typed, Caller, Engine};

impl Engine {
    pub(crate) async fn authorize_project(
        &self,
        caller: Caller,
        project_id: &str,
    ) -> CoreResult<Authorized> {
        let path = EntityPath::project(project_id)?;
        authorize(self.store(), caller, &path).await
    }

    /// Projects the caller is a member of.
    pub async fn list_projects(&self, caller: Caller) -> CoreResult<Vec<Project>> {
        let user = caller.require_user()?;
        self.store()
            .find(EntityKind::Project, &Filter::HasMember(user))
            .await?
            .into_iter()
            .map(typed::<Project>)
            .collect()
    }

    /// Create a project owned by the caller and pre-allocate its placeholder
    /// scenes (numbered from 1) and characters.
    pub async fn create_project(
        &self,
        caller: Caller,
        input: CreateProject,
    ) -> CoreResult<Project> {
        let user = caller.require_user()?;
        validate(&input)?;

        let project = self
            .store()
            .create(NewRecord::Project(NewProject::from_request(&input, user)))
            .await?;
        let project_id = project.id();

        let scenes = input.number_of_scenes.unwrap_or(0);
        let characters = input.number_of_characters.unwrap_or(0);
        if let Err(err) = self.preallocate(project_id, scenes, characters).await {
            tracing::warn!(
                project_id = %project_id,
                error = %err,
                "Pre-allocation failed, removing project"
            );
            let target = EntityRef::new(EntityKind::Project, project_id);
            return match cascade_delete(self.store(), target).await {
                Ok(_) => Err(err),
                Err(cleanup) => Err(CoreError::cascade(
                    "create_project",
                    EntityRef::new(EntityKind::Project, project_id),
                    format!("{err}; cleanup failed: {cleanup}"),
                )),
            };
        }

        tracing::info!(
            project_id = %project_id,
            user_id = %user,
            scenes,
            characters,
            "Project created",
        );
        typed(self.store().get(EntityKind::Project, project_id).await?)
    }

    async fn preallocate(
        &self,
        project_id: EntityId,
        scenes: i32,
        characters: i32,
    ) -> CoreResult<()> {
        let new_scenes = (1..=scenes)
            .map(|n| NewRecord::Scene(NewScene::placeholder(project_id, n)))
            .collect();
        graph::create_under_parent(self.store(), Relation::ProjectScenes, project_id, new_scenes)
            .await?;

        let new_characters = (0..characters)
            .map(|_| NewRecord::Character(NewCharacter::placeholder(project_id)))
            .collect();
        graph::create_under_parent(
            self.store(),
            Relation::ProjectCharacters,
            project_id,
            new_characters,
        )
        .await?;
        Ok(())
    }

    /// A project, optionally with references expanded (`characters.costumes`).
    pub async fn get_project(
        &self,
        caller: Caller,
        project_id: &str,
        expand_paths: &[String],
    ) -> CoreResult<Value> {
        let auth = self.authorize_project(caller, project_id).await?;
        let record: Record = auth.project.into();
        Ok(expand(self.store(), &record, expand_paths).await?)
    }

    pub async fn update_project(
        &self,
        caller: Caller,
        project_id: &str,
        input: UpdateProject,
    ) -> CoreResult<Project> {
        validate(&input)?;
        let auth = self.authorize_project(caller, project_id).await?;
        let updated = self
            .store()
            .update(auth.project.id, RecordPatch::Project(input))
            .await?;
        typed(updated)
    }

    /// Delete a project with all of its characters, costumes, measurements,
    /// scenes, locations and images.
    pub async fn delete_project(
        &self,
        caller: Caller,
        project_id: &str,
    ) -> CoreResult<CascadeReport> {
        let auth = self.authorize_project(caller, project_id).await?;
        cascade_delete(
            self.store(),
            EntityRef::new(EntityKind::Project, auth.project.id),
        )
        .await
    }

    /// Add a user to the project's members. Adding an existing member is a no-op.
    pub async fn add_member(
        &self,
        caller: Caller,
        project_id: &str,
        user_id: &str,
    ) -> CoreResult<Project> {
        let member = parse_id(user_id)?;
        let auth = self.authorize_project(caller, project_id).await?;
        graph::attach(self.store(), Relation::ProjectUsers, auth.project.id, member).await?;
        tracing::info!(project_id = %auth.project.id, member_id = %member, "Member added");
        typed(self.store().get(EntityKind::Project, auth.project.id).await?)
    }

    /// Remove a user from the project's members. The last member cannot leave.
    pub async fn remove_member(
        &self,
        caller: Caller,
        project_id: &str,
        user_id: &str,
    ) -> CoreResult<Project> {
        let member = parse_id(user_id)?;
        let auth = self.authorize_project(caller, project_id).await?;
        if auth.project.users.as_slice() == [member] {
            return Err(CoreError::Validation(
                "a project must keep at least one member".to_string(),
            ));
        }
        graph::detach(self.store(), Relation::ProjectUsers, auth.project.id, member).await?;
        tracing::info!(project_id = %auth.project.id, member_id = %member, "Member removed");
        typed(self.store().get(EntityKind::Project, auth.project.id).await?)
    }

    /// Report every inconsistency in the project's reference graph.
    pub async fn check_integrity(
        &self,
        caller: Caller,
        project_id: &str,
    ) -> CoreResult<IntegrityReport> {
        let auth = self.authorize_project(caller, project_id).await?;
        check_project(self.store(), auth.project.id).await
    }
}
