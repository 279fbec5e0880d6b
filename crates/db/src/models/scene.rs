//! Scene entity model and DTOs.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `scenes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Scene {
    pub id: EntityId,
    pub project_id: EntityId,
    /// Free-form script numbering such as `"12"` or `"12A"`.
    pub scene_number: Option<String>,
    pub story_day_number: Option<String>,
    pub description: Option<String>,
    pub time_of_day: Option<String>,
    pub season: Option<String>,
    pub number_of_actors: Option<i32>,
    pub number_of_extras: Option<i32>,
    pub location_id: Option<EntityId>,
    pub characters: Vec<EntityId>,
    pub costumes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a scene.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateScene {
    #[validate(length(max = 20))]
    pub scene_number: Option<String>,
    pub story_day_number: Option<String>,
    pub description: Option<String>,
    pub time_of_day: Option<String>,
    pub season: Option<String>,
    #[validate(range(min = 0))]
    pub number_of_actors: Option<i32>,
    #[validate(range(min = 0))]
    pub number_of_extras: Option<i32>,
}

/// Insert payload for a scene. The location is linked afterwards.
#[derive(Debug, Clone)]
pub struct NewScene {
    pub project_id: EntityId,
    pub scene_number: Option<String>,
    pub story_day_number: Option<String>,
    pub description: Option<String>,
    pub time_of_day: Option<String>,
    pub season: Option<String>,
    pub number_of_actors: Option<i32>,
    pub number_of_extras: Option<i32>,
}

impl NewScene {
    /// A placeholder scene carrying only its position in the script.
    pub fn placeholder(project_id: EntityId, scene_number: i32) -> Self {
        Self {
            project_id,
            scene_number: Some(scene_number.to_string()),
            story_day_number: None,
            description: None,
            time_of_day: None,
            season: None,
            number_of_actors: None,
            number_of_extras: None,
        }
    }

    pub fn from_request(input: &CreateScene, project_id: EntityId) -> Self {
        Self {
            project_id,
            scene_number: input.scene_number.clone(),
            story_day_number: input.story_day_number.clone(),
            description: input.description.clone(),
            time_of_day: input.time_of_day.clone(),
            season: input.season.clone(),
            number_of_actors: input.number_of_actors,
            number_of_extras: input.number_of_extras,
        }
    }
}

/// DTO for updating a scene. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScene {
    #[validate(length(max = 20))]
    pub scene_number: Option<String>,
    pub story_day_number: Option<String>,
    pub description: Option<String>,
    pub time_of_day: Option<String>,
    pub season: Option<String>,
    #[validate(range(min = 0))]
    pub number_of_actors: Option<i32>,
    #[validate(range(min = 0))]
    pub number_of_extras: Option<i32>,
}

impl UpdateScene {
    pub fn apply(&self, scene: &mut Scene) {
        if let Some(v) = &self.scene_number {
            scene.scene_number = Some(v.clone());
        }
        if let Some(v) = &self.story_day_number {
            scene.story_day_number = Some(v.clone());
        }
        if let Some(v) = &self.description {
            scene.description = Some(v.clone());
        }
        if let Some(v) = &self.time_of_day {
            scene.time_of_day = Some(v.clone());
        }
        if let Some(v) = &self.season {
            scene.season = Some(v.clone());
        }
        if let Some(v) = self.number_of_actors {
            scene.number_of_actors = Some(v);
        }
        if let Some(v) = self.number_of_extras {
            scene.number_of_extras = Some(v);
        }
    }
}
