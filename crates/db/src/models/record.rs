//! Kind-erased wrappers over the seven entity models.
//!
//! The store and the engine work on [`Record`] so that relation primitives can
//! be written once for every kind. Typed access is recovered with
//! [`Entity::from_record`].

use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use costume_core::types::{EntityId, Timestamp};
use serde::Serialize;

use super::character::{Character, NewCharacter, UpdateCharacter};
use super::costume::{Costume, NewCostume, UpdateCostume};
use super::image::{Image, NewImage};
use super::location::{Location, NewLocation, UpdateLocation};
use super::measurements::{Measurements, NewMeasurements, UpdateMeasurements};
use super::project::{NewProject, Project, UpdateProject};
use super::scene::{NewScene, Scene, UpdateScene};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Project(Project),
    Character(Character),
    Costume(Costume),
    Scene(Scene),
    Location(Location),
    Measurements(Measurements),
    Image(Image),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Project(_) => EntityKind::Project,
            Record::Character(_) => EntityKind::Character,
            Record::Costume(_) => EntityKind::Costume,
            Record::Scene(_) => EntityKind::Scene,
            Record::Location(_) => EntityKind::Location,
            Record::Measurements(_) => EntityKind::Measurements,
            Record::Image(_) => EntityKind::Image,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Record::Project(r) => r.id,
            Record::Character(r) => r.id,
            Record::Costume(r) => r.id,
            Record::Scene(r) => r.id,
            Record::Location(r) => r.id,
            Record::Measurements(r) => r.id,
            Record::Image(r) => r.id,
        }
    }

    /// Members of `relation`, or `None` when this record does not own it.
    pub fn set(&self, relation: Relation) -> Option<&[EntityId]> {
        let set = match (self, relation) {
            (Record::Project(p), Relation::ProjectUsers) => &p.users,
            (Record::Project(p), Relation::ProjectCharacters) => &p.characters,
            (Record::Project(p), Relation::ProjectScenes) => &p.scenes,
            (Record::Project(p), Relation::ProjectLocations) => &p.locations,
            (Record::Character(c), Relation::CharacterScenes) => &c.scenes,
            (Record::Character(c), Relation::CharacterCostumes) => &c.costumes,
            (Record::Costume(c), Relation::CostumeScenes) => &c.scenes,
            (Record::Scene(s), Relation::SceneCharacters) => &s.characters,
            (Record::Scene(s), Relation::SceneCostumes) => &s.costumes,
            (Record::Location(l), Relation::LocationScenes) => &l.scenes,
            (Record::Image(i), Relation::ImageCharacters) => &i.characters,
            (Record::Image(i), Relation::ImageScenes) => &i.scenes,
            (Record::Image(i), Relation::ImageCostumes) => &i.costumes,
            _ => return None,
        };
        Some(set.as_slice())
    }

    /// Mutable access to a set together with its counter, if it has one.
    pub fn set_mut(
        &mut self,
        relation: Relation,
    ) -> Option<(&mut Vec<EntityId>, Option<&mut i32>)> {
        match (self, relation) {
            (Record::Project(p), Relation::ProjectUsers) => Some((&mut p.users, None)),
            (Record::Project(p), Relation::ProjectCharacters) => {
                Some((&mut p.characters, Some(&mut p.number_of_characters)))
            }
            (Record::Project(p), Relation::ProjectScenes) => {
                Some((&mut p.scenes, Some(&mut p.number_of_scenes)))
            }
            (Record::Project(p), Relation::ProjectLocations) => Some((&mut p.locations, None)),
            (Record::Character(c), Relation::CharacterScenes) => Some((&mut c.scenes, None)),
            (Record::Character(c), Relation::CharacterCostumes) => {
                Some((&mut c.costumes, Some(&mut c.number_of_costumes)))
            }
            (Record::Costume(c), Relation::CostumeScenes) => {
                Some((&mut c.scenes, Some(&mut c.number_of_scenes)))
            }
            (Record::Scene(s), Relation::SceneCharacters) => Some((&mut s.characters, None)),
            (Record::Scene(s), Relation::SceneCostumes) => Some((&mut s.costumes, None)),
            (Record::Location(l), Relation::LocationScenes) => Some((&mut l.scenes, None)),
            (Record::Image(i), Relation::ImageCharacters) => Some((&mut i.characters, None)),
            (Record::Image(i), Relation::ImageScenes) => Some((&mut i.scenes, None)),
            (Record::Image(i), Relation::ImageCostumes) => Some((&mut i.costumes, None)),
            _ => None,
        }
    }

    /// Current value of the counter tied to `relation`.
    pub fn counter(&self, relation: Relation) -> Option<i32> {
        match (self, relation) {
            (Record::Project(p), Relation::ProjectCharacters) => Some(p.number_of_characters),
            (Record::Project(p), Relation::ProjectScenes) => Some(p.number_of_scenes),
            (Record::Character(c), Relation::CharacterCostumes) => Some(c.number_of_costumes),
            (Record::Costume(c), Relation::CostumeScenes) => Some(c.number_of_scenes),
            _ => None,
        }
    }

    /// Value of a singular reference. `None` when unset or not owned.
    pub fn field(&self, field: Field) -> Option<EntityId> {
        match (self, field) {
            (Record::Character(c), Field::CharacterProject) => Some(c.project_id),
            (Record::Character(c), Field::CharacterMeasurements) => c.measurements_id,
            (Record::Costume(c), Field::CostumeProject) => Some(c.project_id),
            (Record::Costume(c), Field::CostumeCharacter) => Some(c.character_id),
            (Record::Scene(s), Field::SceneProject) => Some(s.project_id),
            (Record::Scene(s), Field::SceneLocation) => s.location_id,
            (Record::Location(l), Field::LocationProject) => Some(l.project_id),
            (Record::Measurements(m), Field::MeasurementsProject) => Some(m.project_id),
            (Record::Measurements(m), Field::MeasurementsCharacter) => Some(m.character_id),
            (Record::Image(i), Field::ImageProject) => Some(i.project_id),
            _ => None,
        }
    }

    /// Mutable access to an optional singular reference.
    pub fn optional_field_mut(&mut self, field: Field) -> Option<&mut Option<EntityId>> {
        match (self, field) {
            (Record::Character(c), Field::CharacterMeasurements) => Some(&mut c.measurements_id),
            (Record::Scene(s), Field::SceneLocation) => Some(&mut s.location_id),
            _ => None,
        }
    }

    /// The project this record belongs to (itself for a project).
    pub fn project_id(&self) -> EntityId {
        match self {
            Record::Project(p) => p.id,
            Record::Character(c) => c.project_id,
            Record::Costume(c) => c.project_id,
            Record::Scene(s) => s.project_id,
            Record::Location(l) => l.project_id,
            Record::Measurements(m) => m.project_id,
            Record::Image(i) => i.project_id,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            Record::Project(r) => r.created_at,
            Record::Character(r) => r.created_at,
            Record::Costume(r) => r.created_at,
            Record::Scene(r) => r.created_at,
            Record::Location(r) => r.created_at,
            Record::Measurements(r) => r.created_at,
            Record::Image(r) => r.created_at,
        }
    }

    pub fn touch(&mut self, now: Timestamp) {
        match self {
            Record::Project(r) => r.updated_at = now,
            Record::Character(r) => r.updated_at = now,
            Record::Costume(r) => r.updated_at = now,
            Record::Scene(r) => r.updated_at = now,
            Record::Location(r) => r.updated_at = now,
            Record::Measurements(r) => r.updated_at = now,
            Record::Image(r) => r.updated_at = now,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Typed view over a [`Record`].
pub trait Entity: Sized {
    const KIND: EntityKind;

    fn from_record(record: Record) -> Option<Self>;
    fn into_record(self) -> Record;
}

macro_rules! impl_entity {
    ($($ty:ident),*) => {
        $(
            impl Entity for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn from_record(record: Record) -> Option<Self> {
                    match record {
                        Record::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_record(self) -> Record {
                    Record::$ty(self)
                }
            }

            impl From<$ty> for Record {
                fn from(value: $ty) -> Self {
                    Record::$ty(value)
                }
            }
        )*
    };
}

impl_entity!(Project, Character, Costume, Scene, Location, Measurements, Image);

/// Insert payload for any kind.
#[derive(Debug, Clone)]
pub enum NewRecord {
    Project(NewProject),
    Character(NewCharacter),
    Costume(NewCostume),
    Scene(NewScene),
    Location(NewLocation),
    Measurements(NewMeasurements),
    Image(NewImage),
}

impl NewRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            NewRecord::Project(_) => EntityKind::Project,
            NewRecord::Character(_) => EntityKind::Character,
            NewRecord::Costume(_) => EntityKind::Costume,
            NewRecord::Scene(_) => EntityKind::Scene,
            NewRecord::Location(_) => EntityKind::Location,
            NewRecord::Measurements(_) => EntityKind::Measurements,
            NewRecord::Image(_) => EntityKind::Image,
        }
    }

    /// Materialize the record with empty sets and zero counters.
    pub fn into_record(self, id: EntityId, now: Timestamp) -> Record {
        match self {
            NewRecord::Project(n) => Record::Project(Project {
                id,
                title: n.title,
                description: n.description,
                director: n.director,
                writer: n.writer,
                production_name: n.production_name,
                date: n.date,
                number_of_scenes: 0,
                number_of_characters: 0,
                users: n.users,
                characters: Vec::new(),
                scenes: Vec::new(),
                locations: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Character(n) => Record::Character(Character {
                id,
                project_id: n.project_id,
                name: n.name,
                actor_name: n.actor_name,
                age: n.age,
                image_url: n.image_url,
                number_of_costumes: 0,
                measurements_id: None,
                scenes: Vec::new(),
                costumes: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Costume(n) => Record::Costume(Costume {
                id,
                project_id: n.project_id,
                character_id: n.character_id,
                costume_number: n.costume_number,
                description: n.description,
                elements: n.elements,
                gender: n.gender,
                image_url: n.image_url,
                number_of_scenes: 0,
                scenes: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Scene(n) => Record::Scene(Scene {
                id,
                project_id: n.project_id,
                scene_number: n.scene_number,
                story_day_number: n.story_day_number,
                description: n.description,
                time_of_day: n.time_of_day,
                season: n.season,
                number_of_actors: n.number_of_actors,
                number_of_extras: n.number_of_extras,
                location_id: None,
                characters: Vec::new(),
                costumes: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Location(n) => Record::Location(Location {
                id,
                project_id: n.project_id,
                decor: n.decor,
                locale: n.locale,
                scenes: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Measurements(n) => {
                let v = n.values;
                Record::Measurements(Measurements {
                    id,
                    project_id: n.project_id,
                    character_id: n.character_id,
                    height: v.height,
                    shoulders: v.shoulders,
                    chest: v.chest,
                    waist: v.waist,
                    hips: v.hips,
                    arm: v.arm,
                    leg: v.leg,
                    unit: v.unit,
                    shirt_size: v.shirt_size,
                    coat_size: v.coat_size,
                    trousers_size: v.trousers_size,
                    shoe_size: v.shoe_size,
                    suit_size: v.suit_size,
                    bra_size: v.bra_size,
                    created_at: now,
                    updated_at: now,
                })
            }
            NewRecord::Image(n) => Record::Image(Image {
                id,
                project_id: n.project_id,
                name: n.name,
                image_url: n.image_url,
                characters: Vec::new(),
                scenes: Vec::new(),
                costumes: Vec::new(),
                created_at: now,
                updated_at: now,
            }),
        }
    }
}

/// Scalar-field update for the kinds that can be edited. Images are
/// catalogued once and never edited.
#[derive(Debug, Clone)]
pub enum RecordPatch {
    Project(UpdateProject),
    Character(UpdateCharacter),
    Costume(UpdateCostume),
    Scene(UpdateScene),
    Location(UpdateLocation),
    Measurements(UpdateMeasurements),
}

impl RecordPatch {
    pub fn kind(&self) -> EntityKind {
        match self {
            RecordPatch::Project(_) => EntityKind::Project,
            RecordPatch::Character(_) => EntityKind::Character,
            RecordPatch::Costume(_) => EntityKind::Costume,
            RecordPatch::Scene(_) => EntityKind::Scene,
            RecordPatch::Location(_) => EntityKind::Location,
            RecordPatch::Measurements(_) => EntityKind::Measurements,
        }
    }

    /// Apply to a record of the same kind. Returns `false` on a kind mismatch.
    pub fn apply(&self, record: &mut Record) -> bool {
        match (self, record) {
            (RecordPatch::Project(p), Record::Project(r)) => p.apply(r),
            (RecordPatch::Character(p), Record::Character(r)) => p.apply(r),
            (RecordPatch::Costume(p), Record::Costume(r)) => p.apply(r),
            (RecordPatch::Scene(p), Record::Scene(r)) => p.apply(r),
            (RecordPatch::Location(p), Record::Location(r)) => p.apply(r),
            (RecordPatch::Measurements(p), Record::Measurements(r)) => p.apply(r),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use costume_core::types::new_id;

    fn scene(project_id: EntityId) -> Record {
        NewRecord::Scene(NewScene::placeholder(project_id, 3)).into_record(new_id(), Utc::now())
    }

    #[test]
    fn new_records_start_with_empty_sets_and_zero_counters() {
        let project = NewRecord::Project(NewProject {
            title: "Hamlet".into(),
            description: None,
            director: None,
            writer: None,
            production_name: None,
            date: None,
            users: vec![new_id()],
        })
        .into_record(new_id(), Utc::now());

        for relation in Relation::ALL.into_iter().filter(|r| r.owner() == EntityKind::Project) {
            if relation == Relation::ProjectUsers {
                assert_eq!(project.set(relation).map(<[_]>::len), Some(1));
            } else {
                assert_eq!(project.set(relation), Some(&[][..]));
            }
        }
        assert_eq!(project.counter(Relation::ProjectScenes), Some(0));
    }

    #[test]
    fn set_access_is_scoped_to_owner_kind() {
        let record = scene(new_id());
        assert!(record.set(Relation::SceneCostumes).is_some());
        assert!(record.set(Relation::CostumeScenes).is_none());
        assert!(record.counter(Relation::SceneCostumes).is_none());
    }

    #[test]
    fn back_references_are_exposed_as_fields() {
        let project_id = new_id();
        let mut record = scene(project_id);
        assert_eq!(record.field(Field::SceneProject), Some(project_id));
        assert_eq!(record.field(Field::SceneLocation), None);

        let location = new_id();
        *record.optional_field_mut(Field::SceneLocation).unwrap() = Some(location);
        assert_eq!(record.field(Field::SceneLocation), Some(location));
        assert!(record.optional_field_mut(Field::SceneProject).is_none());
    }

    #[test]
    fn image_tags_carry_no_counters() {
        let project_id = new_id();
        let record = NewRecord::Image(NewImage {
            project_id,
            name: Some("Astrov, act one".into()),
            image_url: "https://img.example.com/astrov.jpg".into(),
        })
        .into_record(new_id(), Utc::now());
        assert_eq!(record.kind(), EntityKind::Image);
        assert_eq!(record.set(Relation::ImageScenes), Some(&[][..]));
        assert_eq!(record.counter(Relation::ImageScenes), None);
        assert_eq!(record.field(Field::ImageProject), Some(project_id));
        assert_eq!(record.project_id(), project_id);
    }

    #[test]
    fn patch_of_other_kind_is_refused() {
        let mut record = scene(new_id());
        let patch = RecordPatch::Location(UpdateLocation::default());
        assert!(!patch.apply(&mut record));

        let patch = RecordPatch::Scene(UpdateScene {
            description: Some("Night market".into()),
            ..Default::default()
        });
        assert!(patch.apply(&mut record));
        let scene = Scene::from_record(record).unwrap();
        assert_eq!(scene.description.as_deref(), Some("Night market"));
        assert_eq!(scene.scene_number.as_deref(), Some("3"));
    }
}
