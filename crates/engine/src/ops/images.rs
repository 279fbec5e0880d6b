//! Image catalog: pictures hosted elsewhere, tagged with characters, scenes
//! and costumes of one project.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::{EntityKind, EntityRef};
use costume_core::relations::Relation;
use costume_core::types::{parse_id, EntityId};
use costume_db::models::image::{CreateImage, Image, NewImage};
use costume_db::models::{NewRecord, Record};
use costume_db::store::expand;
use costume_db::Filter;
use serde_json::Value;

use super::{parse_ids, validate};
use crate::cascade::{cascade_delete, CascadeReport};
use crate::graph;
use crate::{typed, Caller, Engine};

impl Engine {
    /// Load an image of the project. An image of another project is refused
    /// the same way as a missing one.
    async fn authorize_image(
        &self,
        caller: Caller,
        project_id: &str,
        image_id: &str,
    ) -> CoreResult<Record> {
        let image_id = parse_id(image_id)?;
        let auth = self.authorize_project(caller, project_id).await?;
        match self.store().get(EntityKind::Image, image_id).await {
            Ok(image) if image.project_id() == auth.project.id => Ok(image),
            Ok(_) => Err(CoreError::forbidden()),
            Err(err) if err.is_missing() => Err(CoreError::forbidden()),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether every id names a costume of `project_id`.
    async fn owns_costumes(&self, project_id: EntityId, ids: &[EntityId]) -> CoreResult<bool> {
        if ids.is_empty() {
            return Ok(true);
        }
        let found = self.store().get_many(EntityKind::Costume, ids).await?;
        Ok(ids.iter().all(|id| {
            found
                .iter()
                .any(|c| c.id() == *id && c.project_id() == project_id)
        }))
    }

    /// Images catalogued for the project, oldest first.
    pub async fn list_images(&self, caller: Caller, project_id: &str) -> CoreResult<Vec<Image>> {
        let auth = self.authorize_project(caller, project_id).await?;
        self.store()
            .find(
                EntityKind::Image,
                &Filter::in_project(EntityKind::Image, auth.project.id),
            )
            .await?
            .into_iter()
            .map(typed::<Image>)
            .collect()
    }

    /// Catalogue an image and tag it. Every tagged id must belong to the
    /// project; nothing is written otherwise.
    pub async fn create_image(
        &self,
        caller: Caller,
        project_id: &str,
        input: CreateImage,
    ) -> CoreResult<Image> {
        validate(&input)?;
        let characters = parse_ids(&input.characters)?;
        let scenes = parse_ids(&input.scenes)?;
        let costumes = parse_ids(&input.costumes)?;
        let auth = self.authorize_project(caller, project_id).await?;

        let tags_owned = characters.iter().all(|id| auth.owns_character(*id))
            && scenes.iter().all(|id| auth.owns_scene(*id))
            && self.owns_costumes(auth.project.id, &costumes).await?;
        if !tags_owned {
            return Err(CoreError::forbidden());
        }

        let created = self
            .store()
            .create(NewRecord::Image(NewImage::from_request(&input, auth.project.id)))
            .await?;
        let image_id = created.id();

        let tags = [
            (Relation::ImageCharacters, &characters),
            (Relation::ImageScenes, &scenes),
            (Relation::ImageCostumes, &costumes),
        ];
        for (relation, ids) in tags {
            for id in ids {
                if let Err(err) = graph::attach(self.store(), relation, image_id, *id).await {
                    return match self.store().delete(EntityKind::Image, image_id).await {
                        Ok(_) => Err(err),
                        Err(cleanup) => Err(CoreError::cascade(
                            "create_image",
                            EntityRef::new(EntityKind::Image, image_id),
                            format!("{err}; cleanup failed: {cleanup}"),
                        )),
                    };
                }
            }
        }

        tracing::info!(
            project_id = %auth.project.id,
            image_id = %image_id,
            tags = characters.len() + scenes.len() + costumes.len(),
            "Image catalogued",
        );
        typed(self.store().get(EntityKind::Image, image_id).await?)
    }

    /// An image with its tagged records expanded.
    pub async fn get_image(
        &self,
        caller: Caller,
        project_id: &str,
        image_id: &str,
    ) -> CoreResult<Value> {
        let image = self.authorize_image(caller, project_id, image_id).await?;
        Ok(expand(self.store(), &image, &["characters", "scenes", "costumes"]).await?)
    }

    pub async fn delete_image(
        &self,
        caller: Caller,
        project_id: &str,
        image_id: &str,
    ) -> CoreResult<CascadeReport> {
        let image = self.authorize_image(caller, project_id, image_id).await?;
        cascade_delete(self.store(), EntityRef::new(EntityKind::Image, image.id())).await
    }
}
