//! Costume entity model and DTOs.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `costumes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Costume {
    pub id: EntityId,
    pub project_id: EntityId,
    pub character_id: EntityId,
    /// Unique among the costumes of `character_id`.
    pub costume_number: i32,
    pub description: Option<String>,
    pub elements: Vec<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
    pub number_of_scenes: i32,
    pub scenes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a costume. An omitted number is assigned.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCostume {
    pub costume_number: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub elements: Vec<String>,
    pub gender: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Insert payload for a costume. The number has already been resolved.
#[derive(Debug, Clone)]
pub struct NewCostume {
    pub project_id: EntityId,
    pub character_id: EntityId,
    pub costume_number: i32,
    pub description: Option<String>,
    pub elements: Vec<String>,
    pub gender: Option<String>,
    pub image_url: Option<String>,
}

impl NewCostume {
    pub fn placeholder(project_id: EntityId, character_id: EntityId, costume_number: i32) -> Self {
        Self {
            project_id,
            character_id,
            costume_number,
            description: None,
            elements: Vec::new(),
            gender: None,
            image_url: None,
        }
    }

    pub fn from_request(
        input: &CreateCostume,
        project_id: EntityId,
        character_id: EntityId,
        costume_number: i32,
    ) -> Self {
        Self {
            project_id,
            character_id,
            costume_number,
            description: input.description.clone(),
            elements: input.elements.clone(),
            gender: input.gender.clone(),
            image_url: input.image_url.clone(),
        }
    }
}

/// DTO for updating a costume. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCostume {
    pub costume_number: Option<i32>,
    pub description: Option<String>,
    pub elements: Option<Vec<String>>,
    pub gender: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl UpdateCostume {
    pub fn apply(&self, costume: &mut Costume) {
        if let Some(number) = self.costume_number {
            costume.costume_number = number;
        }
        if let Some(description) = &self.description {
            costume.description = Some(description.clone());
        }
        if let Some(elements) = &self.elements {
            costume.elements = elements.clone();
        }
        if let Some(gender) = &self.gender {
            costume.gender = Some(gender.clone());
        }
        if let Some(image_url) = &self.image_url {
            costume.image_url = Some(image_url.clone());
        }
    }
}
