//! Costume numbering and bulk operations.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{engine, project, s, user, Fault, FlakyStore};
use costume_core::error::CoreError;
use costume_core::kinds::EntityKind;
use costume_db::models::character::CreateCharacter;
use costume_db::models::costume::{CreateCostume, UpdateCostume};
use costume_engine::{Caller, Engine};

fn numbered(n: i32) -> CreateCostume {
    CreateCostume {
        costume_number: Some(n),
        ..Default::default()
    }
}

async fn character(engine: &Engine, caller: Caller, pid: &str, costumes: i32) -> String {
    let character = engine
        .create_character(
            caller,
            pid,
            CreateCharacter {
                number_of_costumes: Some(costumes),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    s(character.id)
}

#[tokio::test]
async fn omitted_number_follows_the_highest() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 0).await;

    for n in [1, 2, 4] {
        engine.create_costume(caller, &pid, &cid, numbered(n)).await.unwrap();
    }

    let err = engine
        .create_costume(caller, &pid, &cid, numbered(2))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CoreError::DuplicateSequenceNumber { number: 2, next_free: 5 }
    );

    let next = engine
        .create_costume(caller, &pid, &cid, CreateCostume::default())
        .await
        .unwrap();
    assert_eq!(next.costume_number, 5);
}

#[tokio::test]
async fn first_costume_is_number_one() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 0).await;

    let costume = engine
        .create_costume(caller, &pid, &cid, CreateCostume::default())
        .await
        .unwrap();
    assert_eq!(costume.costume_number, 1);

    let err = engine
        .create_costume(caller, &pid, &cid, numbered(0))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Validation(_));
}

#[tokio::test]
async fn numbers_are_per_character() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let first = character(&engine, caller, &pid, 3).await;
    let second = character(&engine, caller, &pid, 0).await;

    let costume = engine.create_costume(caller, &pid, &second, numbered(1)).await.unwrap();
    assert_eq!(costume.costume_number, 1);

    let listed = engine.list_costumes(caller, &pid, &first).await.unwrap();
    let numbers: Vec<i32> = listed.iter().map(|c| c.costume_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[tokio::test]
async fn update_may_keep_its_own_number() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 2).await;
    let costumes = engine.list_costumes(caller, &pid, &cid).await.unwrap();
    let second = &costumes[1];

    let updated = engine
        .update_costume(
            caller,
            &pid,
            &cid,
            &s(second.id),
            UpdateCostume {
                costume_number: Some(2),
                description: Some("Grey waistcoat".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.costume_number, 2);
    assert_eq!(updated.description.as_deref(), Some("Grey waistcoat"));

    let err = engine
        .update_costume(
            caller,
            &pid,
            &cid,
            &s(second.id),
            UpdateCostume {
                costume_number: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::DuplicateSequenceNumber { number: 1, .. });
}

#[tokio::test]
async fn delete_all_costumes_empties_the_character() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 0).await;
    let cid = character(&engine, caller, &pid, 3).await;
    let scene_id = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    let costumes = engine.list_costumes(caller, &pid, &cid).await.unwrap();
    engine
        .attach_costume_scenes(caller, &pid, &cid, &s(costumes[0].id), &[s(scene_id)])
        .await
        .unwrap();

    let reports = engine.delete_all_costumes(caller, &pid, &cid).await.unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(store.count(EntityKind::Costume).await, 0);

    let character = engine.get_character(caller, &pid, &cid, &[]).await.unwrap();
    assert_eq!(character["number_of_costumes"], 0);
    let scene = engine
        .get_scene(caller, &pid, &s(scene_id), &[])
        .await
        .unwrap();
    assert_eq!(scene["costumes"], serde_json::json!([]));
}

#[tokio::test]
async fn bulk_attach_checks_every_scene_first() {
    let (engine, _) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 1, 0).await;
    let other = project(&engine, caller, 1, 0).await;
    let cid = character(&engine, caller, &pid, 1).await;
    let costume_id = engine.list_costumes(caller, &pid, &cid).await.unwrap()[0].id;
    let own_scene = engine.list_scenes(caller, &pid).await.unwrap()[0].id;
    let foreign_scene = engine.list_scenes(caller, &other).await.unwrap()[0].id;

    let err = engine
        .attach_costume_scenes(
            caller,
            &pid,
            &cid,
            &s(costume_id),
            &[s(own_scene), s(foreign_scene)],
        )
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Forbidden(_));

    let costume = engine
        .get_costume(caller, &pid, &cid, &s(costume_id))
        .await
        .unwrap();
    assert_eq!(costume["scenes"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Concurrent numbering
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_get_distinct_numbers() {
    let (engine, store) = engine();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 0).await;

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let engine = engine.clone();
            let pid = pid.clone();
            let cid = cid.clone();
            tokio::spawn(async move {
                engine
                    .create_costume(caller, &pid, &cid, CreateCostume::default())
                    .await
            })
        })
        .collect();

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap().unwrap().costume_number);
    }
    numbers.sort();
    assert_eq!(numbers, (1..=64).collect::<Vec<_>>());
    assert_eq!(store.count(EntityKind::Costume).await, 64);

    let report = engine.check_integrity(caller, &pid).await.unwrap();
    assert!(report.is_consistent(), "{:?}", report.violations);
}

fn flaky() -> (Engine, Arc<FlakyStore>) {
    let store = Arc::new(FlakyStore::new());
    (Engine::new(store.clone()), store)
}

#[tokio::test]
async fn number_taken_after_the_read_reports_next_free() {
    let (engine, store) = flaky();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 1).await;

    store.fail(Fault::StaleFind(EntityKind::Costume));
    let err = engine
        .create_costume(caller, &pid, &cid, numbered(1))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CoreError::DuplicateSequenceNumber { number: 1, next_free: 2 }
    );
    assert_eq!(store.inner.count(EntityKind::Costume).await, 1);
}

#[tokio::test]
async fn omitted_number_is_chosen_again_after_losing_it() {
    let (engine, store) = flaky();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 1).await;

    store.fail(Fault::StaleFind(EntityKind::Costume));
    let costume = engine
        .create_costume(caller, &pid, &cid, CreateCostume::default())
        .await
        .unwrap();
    assert_eq!(costume.costume_number, 2);
    assert_eq!(
        engine.list_costumes(caller, &pid, &cid).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn renumber_onto_a_number_taken_after_the_read() {
    let (engine, store) = flaky();
    let (_, caller) = user();
    let pid = project(&engine, caller, 0, 0).await;
    let cid = character(&engine, caller, &pid, 2).await;
    let costumes = engine.list_costumes(caller, &pid, &cid).await.unwrap();
    let first = s(costumes[0].id);

    store.fail(Fault::StaleFind(EntityKind::Costume));
    let err = engine
        .update_costume(
            caller,
            &pid,
            &cid,
            &first,
            UpdateCostume {
                costume_number: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(
        err,
        CoreError::DuplicateSequenceNumber { number: 2, next_free: 3 }
    );
    let costumes = engine.list_costumes(caller, &pid, &cid).await.unwrap();
    assert_eq!(
        costumes.iter().map(|c| c.costume_number).collect::<Vec<_>>(),
        vec![1, 2]
    );
}
