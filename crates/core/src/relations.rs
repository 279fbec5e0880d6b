//! Catalog of every reference between entity kinds.
//!
//! A [`Relation`] is a set of ids held by one record (`Project.scenes`,
//! `Costume.scenes`, ...). A [`Field`] is a single id (`Scene.location`,
//! `Costume.character`, ...). Each one names its inverse so the graph
//! maintainer can keep both sides in step, and each set names the counter
//! column that mirrors its size, if any.

use serde::Serialize;

use crate::kinds::EntityKind;

/// The other side of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inverse {
    /// Nothing points back: `Project.users` (users live elsewhere) and the
    /// image catalog, which tags records without them knowing.
    None,
    Set(Relation),
    Field(Field),
}

/// A named reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    ProjectUsers,
    ProjectCharacters,
    ProjectScenes,
    ProjectLocations,
    CharacterScenes,
    CharacterCostumes,
    CostumeScenes,
    SceneCharacters,
    SceneCostumes,
    LocationScenes,
    ImageCharacters,
    ImageScenes,
    ImageCostumes,
}

impl Relation {
    pub const ALL: [Relation; 13] = [
        Relation::ProjectUsers,
        Relation::ProjectCharacters,
        Relation::ProjectScenes,
        Relation::ProjectLocations,
        Relation::CharacterScenes,
        Relation::CharacterCostumes,
        Relation::CostumeScenes,
        Relation::SceneCharacters,
        Relation::SceneCostumes,
        Relation::LocationScenes,
        Relation::ImageCharacters,
        Relation::ImageScenes,
        Relation::ImageCostumes,
    ];

    /// Kind of the record holding the set.
    pub fn owner(self) -> EntityKind {
        match self {
            Relation::ProjectUsers
            | Relation::ProjectCharacters
            | Relation::ProjectScenes
            | Relation::ProjectLocations => EntityKind::Project,
            Relation::CharacterScenes | Relation::CharacterCostumes => EntityKind::Character,
            Relation::CostumeScenes => EntityKind::Costume,
            Relation::SceneCharacters | Relation::SceneCostumes => EntityKind::Scene,
            Relation::LocationScenes => EntityKind::Location,
            Relation::ImageCharacters | Relation::ImageScenes | Relation::ImageCostumes => {
                EntityKind::Image
            }
        }
    }

    /// Kind of the records the set points at. `None` for external users.
    pub fn target(self) -> Option<EntityKind> {
        match self {
            Relation::ProjectUsers => None,
            Relation::ProjectCharacters | Relation::SceneCharacters | Relation::ImageCharacters => {
                Some(EntityKind::Character)
            }
            Relation::ProjectScenes
            | Relation::CharacterScenes
            | Relation::CostumeScenes
            | Relation::LocationScenes
            | Relation::ImageScenes => Some(EntityKind::Scene),
            Relation::ProjectLocations => Some(EntityKind::Location),
            Relation::CharacterCostumes | Relation::SceneCostumes | Relation::ImageCostumes => {
                Some(EntityKind::Costume)
            }
        }
    }

    /// Field name on the owning record; also the storage column name.
    pub fn name(self) -> &'static str {
        match self {
            Relation::ProjectUsers => "users",
            Relation::ProjectCharacters | Relation::SceneCharacters | Relation::ImageCharacters => {
                "characters"
            }
            Relation::ProjectScenes
            | Relation::CharacterScenes
            | Relation::CostumeScenes
            | Relation::LocationScenes
            | Relation::ImageScenes => "scenes",
            Relation::ProjectLocations => "locations",
            Relation::CharacterCostumes | Relation::SceneCostumes | Relation::ImageCostumes => {
                "costumes"
            }
        }
    }

    /// Denormalized counter that must always equal the size of this set.
    pub fn counter(self) -> Option<&'static str> {
        match self {
            Relation::ProjectCharacters => Some("number_of_characters"),
            Relation::ProjectScenes => Some("number_of_scenes"),
            Relation::CharacterCostumes => Some("number_of_costumes"),
            Relation::CostumeScenes => Some("number_of_scenes"),
            _ => None,
        }
    }

    pub fn inverse(self) -> Inverse {
        match self {
            Relation::ProjectUsers
            | Relation::ImageCharacters
            | Relation::ImageScenes
            | Relation::ImageCostumes => Inverse::None,
            Relation::ProjectCharacters => Inverse::Field(Field::CharacterProject),
            Relation::ProjectScenes => Inverse::Field(Field::SceneProject),
            Relation::ProjectLocations => Inverse::Field(Field::LocationProject),
            Relation::CharacterScenes => Inverse::Set(Relation::SceneCharacters),
            Relation::CharacterCostumes => Inverse::Field(Field::CostumeCharacter),
            Relation::CostumeScenes => Inverse::Set(Relation::SceneCostumes),
            Relation::SceneCharacters => Inverse::Set(Relation::CharacterScenes),
            Relation::SceneCostumes => Inverse::Set(Relation::CostumeScenes),
            Relation::LocationScenes => Inverse::Field(Field::SceneLocation),
        }
    }

    /// Owning sets: their members are purged together with the owner.
    pub fn is_owning(self) -> bool {
        matches!(
            self,
            Relation::ProjectCharacters
                | Relation::ProjectScenes
                | Relation::ProjectLocations
                | Relation::CharacterCostumes
        )
    }

    /// Look up a set by its field name on `owner`.
    pub fn from_name(owner: EntityKind, name: &str) -> Option<Relation> {
        Relation::ALL
            .into_iter()
            .find(|r| r.owner() == owner && r.name() == name)
    }

    /// Every set that can contain an id of `kind`.
    pub fn incoming(kind: EntityKind) -> impl Iterator<Item = Relation> {
        Relation::ALL
            .into_iter()
            .filter(move |r| r.target() == Some(kind))
    }
}

/// A named single-valued reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CharacterProject,
    CharacterMeasurements,
    CostumeProject,
    CostumeCharacter,
    SceneProject,
    SceneLocation,
    LocationProject,
    MeasurementsProject,
    MeasurementsCharacter,
    ImageProject,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::CharacterProject,
        Field::CharacterMeasurements,
        Field::CostumeProject,
        Field::CostumeCharacter,
        Field::SceneProject,
        Field::SceneLocation,
        Field::LocationProject,
        Field::MeasurementsProject,
        Field::MeasurementsCharacter,
        Field::ImageProject,
    ];

    pub fn owner(self) -> EntityKind {
        match self {
            Field::CharacterProject | Field::CharacterMeasurements => EntityKind::Character,
            Field::CostumeProject | Field::CostumeCharacter => EntityKind::Costume,
            Field::SceneProject | Field::SceneLocation => EntityKind::Scene,
            Field::LocationProject => EntityKind::Location,
            Field::MeasurementsProject | Field::MeasurementsCharacter => EntityKind::Measurements,
            Field::ImageProject => EntityKind::Image,
        }
    }

    pub fn target(self) -> EntityKind {
        match self {
            Field::CharacterProject
            | Field::CostumeProject
            | Field::SceneProject
            | Field::LocationProject
            | Field::MeasurementsProject
            | Field::ImageProject => EntityKind::Project,
            Field::CharacterMeasurements => EntityKind::Measurements,
            Field::CostumeCharacter | Field::MeasurementsCharacter => EntityKind::Character,
            Field::SceneLocation => EntityKind::Location,
        }
    }

    /// Name used when the field is expanded into a nested record.
    pub fn name(self) -> &'static str {
        match self {
            Field::CharacterProject
            | Field::CostumeProject
            | Field::SceneProject
            | Field::LocationProject
            | Field::MeasurementsProject
            | Field::ImageProject => "project",
            Field::CharacterMeasurements => "measurements",
            Field::CostumeCharacter | Field::MeasurementsCharacter => "character",
            Field::SceneLocation => "location",
        }
    }

    /// Storage column and serialized field name holding the raw id.
    pub fn column(self) -> &'static str {
        match self {
            Field::CharacterProject
            | Field::CostumeProject
            | Field::SceneProject
            | Field::LocationProject
            | Field::MeasurementsProject
            | Field::ImageProject => "project_id",
            Field::CharacterMeasurements => "measurements_id",
            Field::CostumeCharacter | Field::MeasurementsCharacter => "character_id",
            Field::SceneLocation => "location_id",
        }
    }

    /// Optional fields may be unset; the rest are back-references fixed at
    /// creation and only disappear with their record.
    pub fn is_optional(self) -> bool {
        matches!(self, Field::CharacterMeasurements | Field::SceneLocation)
    }

    pub fn inverse(self) -> Inverse {
        match self {
            Field::CharacterProject => Inverse::Set(Relation::ProjectCharacters),
            Field::CharacterMeasurements => Inverse::Field(Field::MeasurementsCharacter),
            Field::CostumeProject | Field::MeasurementsProject | Field::ImageProject => {
                Inverse::None
            }
            Field::CostumeCharacter => Inverse::Set(Relation::CharacterCostumes),
            Field::SceneProject => Inverse::Set(Relation::ProjectScenes),
            Field::SceneLocation => Inverse::Set(Relation::LocationScenes),
            Field::LocationProject => Inverse::Set(Relation::ProjectLocations),
            Field::MeasurementsCharacter => Inverse::Field(Field::CharacterMeasurements),
        }
    }

    pub fn from_name(owner: EntityKind, name: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.owner() == owner && f.name() == name)
    }

    /// Every optional field that can point at a record of `kind`.
    pub fn incoming_optional(kind: EntityKind) -> impl Iterator<Item = Field> {
        Field::ALL
            .into_iter()
            .filter(move |f| f.is_optional() && f.target() == kind)
    }

    /// The back-reference from `kind` to its owning project, if it has one.
    pub fn project_of(kind: EntityKind) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.owner() == kind && f.target() == EntityKind::Project)
    }
}
