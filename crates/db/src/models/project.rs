//! Project entity model and DTOs.

use chrono::NaiveDate;
use costume_core::types::{EntityId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    pub description: Option<String>,
    /// Name of the director.
    pub director: Option<String>,
    /// Name of the script writer.
    pub writer: Option<String>,
    pub production_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub number_of_scenes: i32,
    pub number_of_characters: i32,
    pub users: Vec<UserId>,
    pub characters: Vec<EntityId>,
    pub scenes: Vec<EntityId>,
    pub locations: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a project.
///
/// `number_of_scenes` and `number_of_characters` pre-allocate that many
/// placeholder scenes and characters.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub production_name: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(range(min = 0, max = 1000))]
    pub number_of_scenes: Option<i32>,
    #[validate(range(min = 0, max = 1000))]
    pub number_of_characters: Option<i32>,
}

/// Insert payload for a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub production_name: Option<String>,
    pub date: Option<NaiveDate>,
    /// Initial members, normally just the creator.
    pub users: Vec<UserId>,
}

impl NewProject {
    pub fn from_request(input: &CreateProject, creator: UserId) -> Self {
        Self {
            title: input.title.clone(),
            description: input.description.clone(),
            director: input.director.clone(),
            writer: input.writer.clone(),
            production_name: input.production_name.clone(),
            date: input.date,
            users: vec![creator],
        }
    }
}

/// DTO for updating a project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub production_name: Option<String>,
    pub date: Option<NaiveDate>,
}

impl UpdateProject {
    pub fn apply(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = Some(description.clone());
        }
        if let Some(director) = &self.director {
            project.director = Some(director.clone());
        }
        if let Some(writer) = &self.writer {
            project.writer = Some(writer.clone());
        }
        if let Some(production_name) = &self.production_name {
            project.production_name = Some(production_name.clone());
        }
        if let Some(date) = self.date {
            project.date = Some(date);
        }
    }
}
