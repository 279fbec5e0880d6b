//! Reference maintenance through engine operations.
//!
//! - every link is visible from both ends
//! - linking twice changes nothing
//! - counters always equal set sizes
//! - a scene has at most one location

mod common;

use common::{engine, project, s, user};
use costume_core::kinds::EntityKind;
use costume_db::models::character::{Character, CreateCharacter};
use costume_db::models::costume::{Costume, CreateCostume};
use costume_db::models::location::{CreateLocation, Location};
use costume_db::models::scene::{CreateScene, Scene};
use costume_db::models::Entity;
use costume_db::{EntityStore, MemoryStore};
use costume_core::types::EntityId;

async fn load<T: Entity>(store: &MemoryStore, id: EntityId) -> T {
    T::from_record(store.get(T::KIND, id).await.unwrap()).unwrap()
}

#[tokio::test]
async fn costume_scene_link_is_bidirectional_and_idempotent() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 2, 0).await;
    let character = engine
        .create_character(caller, &pid, CreateCharacter::default())
        .await
        .unwrap();
    let costume = engine
        .create_costume(caller, &pid, &s(character.id), CreateCostume::default())
        .await
        .unwrap();
    let scenes = engine.list_scenes(caller, &pid).await.unwrap();
    let scene_id = scenes[0].id;

    for _ in 0..2 {
        engine
            .attach_costume_scene(caller, &pid, &s(character.id), &s(costume.id), &s(scene_id))
            .await
            .unwrap();
    }

    let costume: Costume = load(&store, costume.id).await;
    let scene: Scene = load(&store, scene_id).await;
    assert_eq!(costume.scenes, vec![scene_id]);
    assert_eq!(costume.number_of_scenes, 1);
    assert_eq!(scene.costumes, vec![costume.id]);

    engine
        .detach_costume_scene(caller, &pid, &s(character.id), &s(costume.id), &s(scene_id))
        .await
        .unwrap();
    let costume: Costume = load(&store, costume.id).await;
    let scene: Scene = load(&store, scene_id).await;
    assert!(costume.scenes.is_empty());
    assert_eq!(costume.number_of_scenes, 0);
    assert!(scene.costumes.is_empty());
}

#[tokio::test]
async fn scene_character_link_updates_both_sides() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 1).await;
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    let project = engine.get_project(caller, &pid, &[]).await.unwrap();
    let character_id: EntityId = project["characters"][0].as_str().unwrap().parse().unwrap();

    let scene = engine
        .attach_scene_character(caller, &pid, &s(scene_id), &s(character_id))
        .await
        .unwrap();
    assert_eq!(scene.characters, vec![character_id]);
    let character: Character = load(&store, character_id).await;
    assert_eq!(character.scenes, vec![scene_id]);

    engine
        .detach_scene_character(caller, &pid, &s(scene_id), &s(character_id))
        .await
        .unwrap();
    let character: Character = load(&store, character_id).await;
    assert!(character.scenes.is_empty());
}

#[tokio::test]
async fn moving_a_scene_to_another_location_updates_both_locations() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 0).await;
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    let first = engine
        .create_location(
            caller,
            &pid,
            CreateLocation { decor: Some("Garden".into()), ..Default::default() },
        )
        .await
        .unwrap();
    let second = engine
        .create_location(
            caller,
            &pid,
            CreateLocation { decor: Some("Study".into()), ..Default::default() },
        )
        .await
        .unwrap();

    engine
        .attach_location_scene(caller, &pid, &s(first.id), &s(scene_id))
        .await
        .unwrap();
    let scene = engine
        .attach_location_scene(caller, &pid, &s(second.id), &s(scene_id))
        .await
        .unwrap();

    assert_eq!(scene.location_id, Some(second.id));
    let first: Location = load(&store, first.id).await;
    let second: Location = load(&store, second.id).await;
    assert!(first.scenes.is_empty());
    assert_eq!(second.scenes, vec![scene_id]);

    // Detaching from a location the scene is not at is a no-op.
    let scene = engine
        .detach_location_scene(caller, &pid, &s(first.id), &s(scene_id))
        .await
        .unwrap();
    assert_eq!(scene.location_id, Some(second.id));

    let scene = engine
        .detach_location_scene(caller, &pid, &s(second.id), &s(scene_id))
        .await
        .unwrap();
    assert_eq!(scene.location_id, None);
}

#[tokio::test]
async fn preallocation_sets_counters() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 3, 2).await;

    let project = engine.get_project(caller, &pid, &[]).await.unwrap();
    assert_eq!(project["number_of_scenes"], 3);
    assert_eq!(project["number_of_characters"], 2);
    assert_eq!(store.count(EntityKind::Scene).await, 3);
    assert_eq!(store.count(EntityKind::Character).await, 2);

    let numbers: Vec<Option<String>> = engine
        .list_scenes(caller, &pid)
        .await
        .unwrap()
        .into_iter()
        .map(|scene| scene.scene_number)
        .collect();
    assert_eq!(
        numbers,
        vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
    );
}

#[tokio::test]
async fn project_expansion_follows_nested_paths() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    engine
        .create_character(
            caller,
            &pid,
            CreateCharacter {
                name: Some("Sonya".into()),
                number_of_costumes: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let expanded = engine
        .get_project(caller, &pid, &["characters.costumes".to_string()])
        .await
        .unwrap();
    let character = &expanded["characters"][0];
    assert_eq!(character["name"], "Sonya");
    assert_eq!(character["costumes"].as_array().unwrap().len(), 2);
    assert_eq!(character["costumes"][0]["costume_number"], 1);
}

#[tokio::test]
async fn search_and_duplicate_scene_numbers() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    for (number, description, time) in [
        ("4", "Dinner on the terrace", "Night"),
        ("4", "Storm", "Day"),
        ("7", "Night fishing", "Dawn"),
    ] {
        engine
            .create_scene(
                caller,
                &pid,
                CreateScene {
                    scene_number: Some(number.into()),
                    description: Some(description.into()),
                    time_of_day: Some(time.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let hits = engine.search_scenes(caller, &pid, "night").await.unwrap();
    let mut found: Vec<_> = hits.iter().filter_map(|s| s.description.clone()).collect();
    found.sort();
    assert_eq!(found, vec!["Dinner on the terrace", "Night fishing"]);

    let hits = engine.search_scenes(caller, &pid, "Da").await.unwrap();
    let mut found: Vec<_> = hits.iter().filter_map(|s| s.description.clone()).collect();
    found.sort();
    assert_eq!(found, vec!["Night fishing", "Storm"]);

    assert_eq!(
        engine.duplicate_scene_numbers(caller, &pid).await.unwrap(),
        vec!["4".to_string()]
    );
}
