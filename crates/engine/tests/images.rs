//! Image catalog: tagging, project scoping and cleanup.

mod common;

use assert_matches::assert_matches;
use common::{engine, project, s, user};
use costume_core::error::CoreError;
use costume_core::kinds::EntityKind;
use costume_db::models::character::CreateCharacter;
use costume_db::models::costume::CreateCostume;
use costume_db::models::image::{CreateImage, Image};
use costume_db::models::Entity;
use costume_db::EntityStore;

fn picture(name: &str) -> CreateImage {
    CreateImage {
        name: Some(name.into()),
        image_url: format!("https://img.example.com/{name}.jpg"),
        ..Default::default()
    }
}

#[tokio::test]
async fn created_image_carries_its_tags() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 2, 0).await;
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[1].id;
    let character = engine
        .create_character(caller, &pid, CreateCharacter::default())
        .await
        .unwrap();
    let costume = engine
        .create_costume(caller, &pid, &s(character.id), CreateCostume::default())
        .await
        .unwrap();

    let image = engine
        .create_image(
            caller,
            &pid,
            CreateImage {
                characters: vec![s(character.id)],
                scenes: vec![s(scene_id)],
                costumes: vec![s(costume.id)],
                ..picture("fitting")
            },
        )
        .await
        .unwrap();
    assert_eq!(image.characters, vec![character.id]);
    assert_eq!(image.scenes, vec![scene_id]);
    assert_eq!(image.costumes, vec![costume.id]);

    let expanded = engine.get_image(caller, &pid, &s(image.id)).await.unwrap();
    assert_eq!(expanded["costumes"][0]["costume_number"], 1);
    assert_eq!(expanded["scenes"][0]["id"], s(scene_id));

    // Tagging is one-way.
    let costume = engine
        .get_costume(caller, &pid, &s(character.id), &s(costume.id))
        .await
        .unwrap();
    assert!(costume.get("images").is_none());
}

#[tokio::test]
async fn listing_is_scoped_to_the_project() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let first = project(&engine, caller, 0, 0).await;
    let second = project(&engine, caller, 0, 0).await;

    engine.create_image(caller, &first, picture("a")).await.unwrap();
    engine.create_image(caller, &first, picture("b")).await.unwrap();
    let other = engine.create_image(caller, &second, picture("c")).await.unwrap();

    let names: Vec<_> = engine
        .list_images(caller, &first)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|image| image.name)
        .collect();
    assert_eq!(names, vec!["a", "b"]);

    // An image is only reachable through its own project.
    assert_matches!(
        engine.get_image(caller, &first, &s(other.id)).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.delete_image(caller, &first, &s(other.id)).await,
        Err(CoreError::Forbidden(_))
    );
}

#[tokio::test]
async fn tags_from_another_project_are_refused() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 1).await;
    let elsewhere = project(&engine, caller, 1, 1).await;
    let foreign = engine.get_project(caller, &elsewhere, &[]).await.unwrap();
    let foreign_character = foreign["characters"][0].as_str().unwrap().to_string();
    let foreign_scene = foreign["scenes"][0].as_str().unwrap().to_string();
    let foreign_costume = engine
        .create_costume(caller, &elsewhere, &foreign_character, CreateCostume::default())
        .await
        .unwrap();

    for input in [
        CreateImage { characters: vec![foreign_character], ..picture("x") },
        CreateImage { scenes: vec![foreign_scene], ..picture("x") },
        CreateImage { costumes: vec![s(foreign_costume.id)], ..picture("x") },
    ] {
        let err = engine.create_image(caller, &pid, input).await.unwrap_err();
        assert_matches!(err, CoreError::Forbidden(_));
    }
    assert_eq!(store.count(EntityKind::Image).await, 0);

    let err = engine
        .create_image(caller, &pid, CreateImage { scenes: vec!["nope".into()], ..picture("x") })
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidIdentifier(raw) if raw == "nope");
}

#[tokio::test]
async fn non_members_cannot_see_or_add_images() {
    let (engine, _) = engine();
    let (_, owner) = user();
    let (_, outsider) = user();
    let pid = project(&engine, owner, 0, 0).await;
    engine.create_image(owner, &pid, picture("set")).await.unwrap();

    assert_matches!(
        engine.list_images(outsider, &pid).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.create_image(outsider, &pid, picture("intruder")).await,
        Err(CoreError::Forbidden(_))
    );
}

#[tokio::test]
async fn deleting_a_tagged_record_untags_the_image() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let character = engine
        .create_character(
            caller,
            &pid,
            CreateCharacter { number_of_costumes: Some(1), ..Default::default() },
        )
        .await
        .unwrap();
    let costume_id = engine.list_costumes(caller, &pid, &s(character.id)).await.unwrap()[0].id;
    let image = engine
        .create_image(
            caller,
            &pid,
            CreateImage {
                characters: vec![s(character.id)],
                costumes: vec![s(costume_id)],
                ..picture("portrait")
            },
        )
        .await
        .unwrap();

    let report = engine.delete_character(caller, &pid, &s(character.id)).await.unwrap();
    let mut untagged: Vec<_> = report
        .detached
        .iter()
        .filter(|d| d.owner.id == image.id)
        .map(|d| d.reference)
        .collect();
    untagged.sort();
    assert_eq!(untagged, vec!["characters", "costumes"]);

    let record = store.get(EntityKind::Image, image.id).await.unwrap();
    let image = Image::from_record(record).unwrap();
    assert!(image.characters.is_empty());
    assert!(image.costumes.is_empty());
}

#[tokio::test]
async fn images_go_with_their_project() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 0).await;
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    let kept = engine
        .create_image(
            caller,
            &pid,
            CreateImage { scenes: vec![s(scene_id)], ..picture("kept") },
        )
        .await
        .unwrap();
    let dropped = engine.create_image(caller, &pid, picture("dropped")).await.unwrap();

    let report = engine.delete_image(caller, &pid, &s(dropped.id)).await.unwrap();
    assert_eq!(report.deleted_count(EntityKind::Image), 1);
    assert_eq!(engine.list_images(caller, &pid).await.unwrap(), vec![kept]);

    let report = engine.delete_project(caller, &pid).await.unwrap();
    assert_eq!(report.deleted_count(EntityKind::Image), 1);
    assert!(report.detached.is_empty());
    assert_eq!(store.count(EntityKind::Image).await, 0);
}
