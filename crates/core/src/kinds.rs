//! The seven persisted entity kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Character,
    Costume,
    Scene,
    Location,
    Measurements,
    Image,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Project,
        EntityKind::Character,
        EntityKind::Costume,
        EntityKind::Scene,
        EntityKind::Location,
        EntityKind::Measurements,
        EntityKind::Image,
    ];

    /// Human-readable name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Character => "Character",
            EntityKind::Costume => "Costume",
            EntityKind::Scene => "Scene",
            EntityKind::Location => "Location",
            EntityKind::Measurements => "Measurements",
            EntityKind::Image => "Image",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed pointer to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
