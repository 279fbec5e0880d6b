//! Authorization boundary: membership and path ownership.

mod common;

use assert_matches::assert_matches;
use common::{engine, project, s, user};
use costume_core::error::CoreError;
use costume_core::types::new_id;
use costume_db::models::character::CreateCharacter;
use costume_db::models::project::UpdateProject;
use costume_engine::Caller;

#[tokio::test]
async fn anonymous_callers_are_unauthenticated() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;

    let err = engine.get_project(Caller::Anonymous, &pid, &[]).await.unwrap_err();
    assert_matches!(err, CoreError::Unauthenticated(_));
    let err = engine.list_projects(Caller::Anonymous).await.unwrap_err();
    assert_matches!(err, CoreError::Unauthenticated(_));
}

#[tokio::test]
async fn non_members_are_forbidden_everywhere() {
    let (engine, _) = engine();
    let (_, owner) = user();
    let (_, outsider) = user();
    let pid = project(&engine, owner, 1, 1).await;
    let project = engine.get_project(owner, &pid, &[]).await.unwrap();
    let cid = project["characters"][0].as_str().unwrap().to_string();
    let scene_id = project["scenes"][0].as_str().unwrap().to_string();

    assert_matches!(
        engine.get_project(outsider, &pid, &[]).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.update_project(outsider, &pid, UpdateProject::default()).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.get_character(outsider, &pid, &cid, &[]).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.delete_scene(outsider, &pid, &scene_id).await,
        Err(CoreError::Forbidden(_))
    );
    // Sub-entity ids are not checked before membership.
    assert_matches!(
        engine.get_character(outsider, &pid, &s(new_id()), &[]).await,
        Err(CoreError::Forbidden(_))
    );
    assert!(engine.list_projects(outsider).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let (engine, _) = engine();
    let (_, caller) = user();

    assert_matches!(
        engine.get_project(caller, &s(new_id()), &[]).await,
        Err(CoreError::NotFound { entity: "Project", .. })
    );
    assert_matches!(
        engine.get_project(caller, "not-an-id", &[]).await,
        Err(CoreError::InvalidIdentifier(_))
    );
}

#[tokio::test]
async fn entities_from_another_parent_are_forbidden() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 0).await;
    let other = project(&engine, caller, 1, 1).await;

    let first = engine
        .create_character(
            caller,
            &pid,
            CreateCharacter { number_of_costumes: Some(1), ..Default::default() },
        )
        .await
        .unwrap();
    let second = engine
        .create_character(
            caller,
            &pid,
            CreateCharacter { number_of_costumes: Some(1), ..Default::default() },
        )
        .await
        .unwrap();
    let foreign_costume = second.costumes[0];

    // A costume addressed through the wrong character.
    assert_matches!(
        engine.get_costume(caller, &pid, &s(first.id), &s(foreign_costume)).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.delete_costume(caller, &pid, &s(first.id), &s(foreign_costume)).await,
        Err(CoreError::Forbidden(_))
    );

    // A character of another project, addressed through this one.
    let other_project = engine.get_project(caller, &other, &[]).await.unwrap();
    let other_character = other_project["characters"][0].as_str().unwrap().to_string();
    assert_matches!(
        engine.get_character(caller, &pid, &other_character, &[]).await,
        Err(CoreError::Forbidden(_))
    );

    // Linking a scene of this project to a character of another one.
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    assert_matches!(
        engine.attach_scene_character(caller, &pid, &s(scene_id), &other_character).await,
        Err(CoreError::Forbidden(_))
    );
}

#[tokio::test]
async fn membership_changes() {
    let (engine, _) = engine();
    let (owner_id, owner) = user();
    let (guest_id, guest) = user();
    let pid = project(&engine, owner, 0, 0).await;

    let project = engine.add_member(owner, &pid, &s(guest_id)).await.unwrap();
    assert_eq!(project.users, vec![owner_id, guest_id]);
    // Adding twice is a no-op.
    let project = engine.add_member(guest, &pid, &s(guest_id)).await.unwrap();
    assert_eq!(project.users.len(), 2);
    assert_eq!(engine.list_projects(guest).await.unwrap().len(), 1);

    engine.remove_member(guest, &pid, &s(owner_id)).await.unwrap();
    assert_matches!(
        engine.get_project(owner, &pid, &[]).await,
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        engine.remove_member(guest, &pid, &s(guest_id)).await,
        Err(CoreError::Validation(_))
    );
}
