//! Image entity model and DTOs.
//!
//! An image is a catalog entry for a picture already hosted elsewhere. It
//! tags characters, scenes and costumes of its project; the tagged records
//! do not point back.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `images` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Image {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: Option<String>,
    pub image_url: String,
    pub characters: Vec<EntityId>,
    pub scenes: Vec<EntityId>,
    pub costumes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for cataloguing an image. Tagged ids are raw strings and are
/// checked against the project before anything is written.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateImage {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(url)]
    pub image_url: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub scenes: Vec<String>,
    #[serde(default)]
    pub costumes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub project_id: EntityId,
    pub name: Option<String>,
    pub image_url: String,
}

impl NewImage {
    pub fn from_request(input: &CreateImage, project_id: EntityId) -> Self {
        Self {
            project_id,
            name: input.name.clone(),
            image_url: input.image_url.clone(),
        }
    }
}
