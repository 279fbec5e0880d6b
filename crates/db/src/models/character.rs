//! Character entity model and DTOs.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `characters` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Character {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: Option<String>,
    pub actor_name: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
    pub number_of_costumes: i32,
    pub measurements_id: Option<EntityId>,
    pub scenes: Vec<EntityId>,
    pub costumes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a character.
///
/// `number_of_costumes` pre-allocates costumes numbered from 1.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub actor_name: Option<String>,
    pub age: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(range(min = 0, max = 500))]
    pub number_of_costumes: Option<i32>,
}

/// Insert payload for a character.
#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub project_id: EntityId,
    pub name: Option<String>,
    pub actor_name: Option<String>,
    pub age: Option<String>,
    pub image_url: Option<String>,
}

impl NewCharacter {
    /// An empty character created when a project pre-allocates characters.
    pub fn placeholder(project_id: EntityId) -> Self {
        Self {
            project_id,
            name: None,
            actor_name: None,
            age: None,
            image_url: None,
        }
    }

    pub fn from_request(input: &CreateCharacter, project_id: EntityId) -> Self {
        Self {
            project_id,
            name: input.name.clone(),
            actor_name: input.actor_name.clone(),
            age: input.age.clone(),
            image_url: input.image_url.clone(),
        }
    }
}

/// DTO for updating a character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub actor_name: Option<String>,
    pub age: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl UpdateCharacter {
    pub fn apply(&self, character: &mut Character) {
        if let Some(name) = &self.name {
            character.name = Some(name.clone());
        }
        if let Some(actor_name) = &self.actor_name {
            character.actor_name = Some(actor_name.clone());
        }
        if let Some(age) = &self.age {
            character.age = Some(age.clone());
        }
        if let Some(image_url) = &self.image_url {
            character.image_url = Some(image_url.clone());
        }
    }
}
