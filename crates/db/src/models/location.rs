//! Location entity model and DTOs.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `locations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Location {
    pub id: EntityId,
    pub project_id: EntityId,
    /// The set or dressing, e.g. "ballroom".
    pub decor: Option<String>,
    /// Where it is shot.
    pub locale: Option<String>,
    pub scenes: Vec<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(max = 200))]
    pub decor: Option<String>,
    #[validate(length(max = 200))]
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub project_id: EntityId,
    pub decor: Option<String>,
    pub locale: Option<String>,
}

impl NewLocation {
    pub fn from_request(input: &CreateLocation, project_id: EntityId) -> Self {
        Self {
            project_id,
            decor: input.decor.clone(),
            locale: input.locale.clone(),
        }
    }
}

pub type UpdateLocation = CreateLocation;

impl CreateLocation {
    pub fn apply(&self, location: &mut Location) {
        if let Some(decor) = &self.decor {
            location.decor = Some(decor.clone());
        }
        if let Some(locale) = &self.locale {
            location.locale = Some(locale.clone());
        }
    }
}
