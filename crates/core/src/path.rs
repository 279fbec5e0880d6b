//! Paths that name a target through its owning chain.
//!
//! Every operation addresses its target as `Project → [Character | Scene |
//! Location] → [Costume]`. Segments are parsed as they are added, so a path
//! that was built successfully contains only well-formed ids.

use crate::error::{CoreError, CoreResult};
use crate::kinds::{EntityKind, EntityRef};
use crate::types::{parse_id, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Character(EntityId),
    Costume(EntityId),
    Scene(EntityId),
    Location(EntityId),
}

impl PathSegment {
    pub fn kind(self) -> EntityKind {
        match self {
            PathSegment::Character(_) => EntityKind::Character,
            PathSegment::Costume(_) => EntityKind::Costume,
            PathSegment::Scene(_) => EntityKind::Scene,
            PathSegment::Location(_) => EntityKind::Location,
        }
    }

    pub fn id(self) -> EntityId {
        match self {
            PathSegment::Character(id)
            | PathSegment::Costume(id)
            | PathSegment::Scene(id)
            | PathSegment::Location(id) => id,
        }
    }

    pub fn entity_ref(self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPath {
    project: EntityId,
    segments: Vec<PathSegment>,
}

impl EntityPath {
    /// Start a path at the project named by `raw`.
    pub fn project(raw: &str) -> CoreResult<Self> {
        Ok(Self::of_project(parse_id(raw)?))
    }

    pub fn of_project(project: EntityId) -> Self {
        Self {
            project,
            segments: Vec::new(),
        }
    }

    pub fn character(self, raw: &str) -> CoreResult<Self> {
        self.push_top_level(PathSegment::Character(parse_id(raw)?))
    }

    pub fn scene(self, raw: &str) -> CoreResult<Self> {
        self.push_top_level(PathSegment::Scene(parse_id(raw)?))
    }

    pub fn location(self, raw: &str) -> CoreResult<Self> {
        self.push_top_level(PathSegment::Location(parse_id(raw)?))
    }

    /// Costumes are only reachable through their character.
    pub fn costume(mut self, raw: &str) -> CoreResult<Self> {
        let id = parse_id(raw)?;
        match self.segments.as_slice() {
            [PathSegment::Character(_)] => {
                self.segments.push(PathSegment::Costume(id));
                Ok(self)
            }
            _ => Err(CoreError::Validation(
                "a costume must be addressed through its character".to_string(),
            )),
        }
    }

    fn push_top_level(mut self, segment: PathSegment) -> CoreResult<Self> {
        if !self.segments.is_empty() {
            return Err(CoreError::Validation(format!(
                "a {} must be addressed directly under its project",
                segment.kind().name().to_lowercase()
            )));
        }
        self.segments.push(segment);
        Ok(self)
    }

    pub fn project_id(&self) -> EntityId {
        self.project
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn character_id(&self) -> Option<EntityId> {
        self.find(EntityKind::Character)
    }

    pub fn costume_id(&self) -> Option<EntityId> {
        self.find(EntityKind::Costume)
    }

    pub fn scene_id(&self) -> Option<EntityId> {
        self.find(EntityKind::Scene)
    }

    pub fn location_id(&self) -> Option<EntityId> {
        self.find(EntityKind::Location)
    }

    fn find(&self, kind: EntityKind) -> Option<EntityId> {
        self.segments
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| s.id())
    }

    /// The entity the path ends at.
    pub fn leaf(&self) -> EntityRef {
        self.segments
            .last()
            .map(|s| s.entity_ref())
            .unwrap_or_else(|| EntityRef::new(EntityKind::Project, self.project))
    }
}
