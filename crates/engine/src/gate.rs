//! Authorization gate.
//!
//! Rules, applied in order:
//! 1. the caller is authenticated;
//! 2. the project exists (`NotFound` otherwise);
//! 3. the caller is a member of the project (`Forbidden`);
//! 4. every path segment belongs to its parent (`Forbidden`): characters,
//!    scenes and locations must be in the project's sets, a costume in its
//!    character's set.
//!
//! Non-members learn nothing about sub-entities: rule 3 fires before any of
//! them is looked up.

use costume_core::error::{CoreError, CoreResult};
use costume_core::kinds::EntityKind;
use costume_core::path::{EntityPath, PathSegment};
use costume_core::types::{EntityId, UserId};
use costume_db::models::character::Character;
use costume_db::models::project::Project;
use costume_db::EntityStore;

use crate::caller::Caller;
use crate::typed;

/// Proof that the caller may act on a path.
#[derive(Debug, Clone)]
pub struct Authorized {
    pub user: UserId,
    pub project: Project,
    /// Loaded when the path goes through a character.
    pub character: Option<Character>,
}

pub async fn authorize(
    store: &dyn EntityStore,
    caller: Caller,
    path: &EntityPath,
) -> CoreResult<Authorized> {
    let user = caller.require_user()?;
    let project: Project =
        typed(store.get(EntityKind::Project, path.project_id()).await?)?;

    if !project.users.contains(&user) {
        tracing::debug!(
            project_id = %project.id,
            user_id = %user,
            "Caller is not a project member"
        );
        return Err(CoreError::forbidden());
    }

    let mut character = None;
    for segment in path.segments() {
        let owned = match *segment {
            PathSegment::Character(id) => project.characters.contains(&id),
            PathSegment::Scene(id) => project.scenes.contains(&id),
            PathSegment::Location(id) => project.locations.contains(&id),
            PathSegment::Costume(id) => character
                .as_ref()
                .is_some_and(|c: &Character| c.costumes.contains(&id)),
        };
        if !owned {
            tracing::debug!(
                project_id = %project.id,
                entity = %segment.entity_ref(),
                "Path segment is outside its parent",
            );
            return Err(CoreError::forbidden());
        }
        if let PathSegment::Character(id) = *segment {
            character = Some(typed(store.get(EntityKind::Character, id).await?)?);
        }
    }

    Ok(Authorized {
        user,
        project,
        character,
    })
}

impl Authorized {
    /// The character on the path. Only call for paths that include one.
    pub fn character(&self) -> CoreResult<&Character> {
        self.character
            .as_ref()
            .ok_or_else(|| CoreError::Validation("path does not name a character".to_string()))
    }

    /// Whether `id` is one of the project's scenes.
    pub fn owns_scene(&self, id: EntityId) -> bool {
        self.project.scenes.contains(&id)
    }

    pub fn owns_character(&self, id: EntityId) -> bool {
        self.project.characters.contains(&id)
    }
}
