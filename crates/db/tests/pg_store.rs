//! Integration tests for the PostgreSQL entity store.
//!
//! These need a running PostgreSQL reachable through `DATABASE_URL`; run them
//! with `cargo test -p costume-db -- --ignored`.

use costume_core::kinds::EntityKind;
use costume_core::relations::{Field, Relation};
use costume_core::types::new_id;
use costume_db::models::character::NewCharacter;
use costume_db::models::costume::NewCostume;
use costume_db::models::project::NewProject;
use costume_db::models::scene::NewScene;
use costume_db::models::NewRecord;
use costume_db::{EntityStore, Filter, PgStore, StoreError};
use sqlx::PgPool;

fn new_project() -> NewRecord {
    NewRecord::Project(NewProject {
        title: "Uncle Vanya".into(),
        description: None,
        director: None,
        writer: None,
        production_name: None,
        date: None,
        users: vec![new_id()],
    })
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    costume_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_set_primitives_keep_counters(pool: PgPool) {
    let store = PgStore::new(pool);
    let p = store.create(new_project()).await.unwrap().id();
    let scenes = store
        .create_many(vec![
            NewRecord::Scene(NewScene::placeholder(p, 1)),
            NewRecord::Scene(NewScene::placeholder(p, 2)),
        ])
        .await
        .unwrap();
    let ids: Vec<_> = scenes.iter().map(|s| s.id()).collect();

    store
        .add_many_to_set(Relation::ProjectScenes, p, &ids)
        .await
        .unwrap();
    assert!(!store
        .add_to_set(Relation::ProjectScenes, p, ids[0])
        .await
        .unwrap());

    let project = store.get(EntityKind::Project, p).await.unwrap();
    assert_eq!(project.set(Relation::ProjectScenes).unwrap().len(), 2);
    assert_eq!(project.counter(Relation::ProjectScenes), Some(2));

    assert_eq!(
        store.pull_from_all(Relation::ProjectScenes, ids[0]).await.unwrap(),
        vec![p]
    );
    let project = store.get(EntityKind::Project, p).await.unwrap();
    assert_eq!(project.counter(Relation::ProjectScenes), Some(1));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_replace_singular_returns_previous(pool: PgPool) {
    let store = PgStore::new(pool);
    let p = store.create(new_project()).await.unwrap().id();
    let s = store
        .create(NewRecord::Scene(NewScene::placeholder(p, 1)))
        .await
        .unwrap()
        .id();
    let l = new_id();

    assert_eq!(
        store.replace_singular(Field::SceneLocation, s, Some(l)).await.unwrap(),
        None
    );
    assert_eq!(
        store.replace_singular(Field::SceneLocation, s, None).await.unwrap(),
        Some(l)
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_costume_number_unique_per_character(pool: PgPool) {
    let store = PgStore::new(pool);
    let p = store.create(new_project()).await.unwrap().id();
    let c = store
        .create(NewRecord::Character(NewCharacter::placeholder(p)))
        .await
        .unwrap()
        .id();

    store
        .create(NewRecord::Costume(NewCostume::placeholder(p, c, 1)))
        .await
        .unwrap();
    let err = store
        .create(NewRecord::Costume(NewCostume::placeholder(p, c, 1)))
        .await
        .unwrap_err();
    let core: costume_core::error::CoreError = err.into();
    assert!(matches!(core, costume_core::error::CoreError::Conflict(_)));

    let costumes = store
        .find(EntityKind::Costume, &Filter::RefersTo(Field::CostumeCharacter, c))
        .await
        .unwrap();
    assert_eq!(costumes.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_missing_owner(pool: PgPool) {
    let store = PgStore::new(pool);
    let err = store
        .remove_from_set(Relation::CharacterScenes, new_id(), new_id())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Missing { kind: EntityKind::Character, .. }));
}
