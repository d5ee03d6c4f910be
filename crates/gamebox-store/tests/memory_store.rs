//! Integration tests for the in-process document store.

use gamebox_store::{DocumentStore, MemoryStore, StoreError, Subscription, Version};
use serde_json::json;

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({"n": 1})).await.unwrap();

    let snap = store.get("rooms/a").await.unwrap();
    assert_eq!(snap.version, Version::INITIAL);
    assert_eq!(snap.value, json!({"n": 1}));
}

#[tokio::test]
async fn test_create_duplicate_fails() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({})).await.unwrap();

    let result = store.create("rooms/a", json!({})).await;
    assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_get_missing_not_found() {
    let store = MemoryStore::new();
    let result = store.get("rooms/nope").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_conditional_update_bumps_version() {
    let store = MemoryStore::new();
    let v1 = store.create("rooms/a", json!({"n": 1})).await.unwrap();

    let v2 = store
        .conditional_update("rooms/a", v1, json!({"n": 2}))
        .await
        .unwrap();

    assert_eq!(v2, v1.next());
    assert_eq!(store.get("rooms/a").await.unwrap().value, json!({"n": 2}));
}

#[tokio::test]
async fn test_conditional_update_wrong_version_conflicts() {
    let store = MemoryStore::new();
    let v1 = store.create("rooms/a", json!({"n": 1})).await.unwrap();
    store
        .conditional_update("rooms/a", v1, json!({"n": 2}))
        .await
        .unwrap();

    // Second writer still holds v1 — must lose.
    let result = store.conditional_update("rooms/a", v1, json!({"n": 3})).await;
    assert!(matches!(result, Err(StoreError::Conflict { .. })));

    // The losing write must not have touched the document.
    assert_eq!(store.get("rooms/a").await.unwrap().value, json!({"n": 2}));
}

#[tokio::test]
async fn test_conditional_update_missing_not_found() {
    let store = MemoryStore::new();
    let result = store
        .conditional_update("rooms/nope", Version::INITIAL, json!({}))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_subscribe_yields_current_snapshot_first() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({"n": 1})).await.unwrap();

    let mut sub = store.subscribe("rooms/a").await.unwrap();
    let snap = sub.next().await.expect("initial snapshot");
    assert_eq!(snap.version, Version::INITIAL);
    assert_eq!(snap.value, json!({"n": 1}));
}

#[tokio::test]
async fn test_subscribe_delivers_updates() {
    let store = MemoryStore::new();
    let v1 = store.create("rooms/a", json!({"n": 1})).await.unwrap();

    let mut sub = store.subscribe("rooms/a").await.unwrap();
    let _ = sub.next().await; // initial

    store
        .conditional_update("rooms/a", v1, json!({"n": 2}))
        .await
        .unwrap();

    let snap = sub.next().await.expect("update snapshot");
    assert_eq!(snap.value, json!({"n": 2}));
    assert_eq!(snap.version, v1.next());
}

#[tokio::test]
async fn test_subscribe_sees_latest_after_burst() {
    // Watch semantics: intermediate snapshots may be skipped, the latest
    // must arrive. Full-state snapshots make that sufficient.
    let store = MemoryStore::new();
    let mut v = store.create("rooms/a", json!({"n": 0})).await.unwrap();

    let mut sub = store.subscribe("rooms/a").await.unwrap();
    let _ = sub.next().await;

    for n in 1..=5 {
        v = store
            .conditional_update("rooms/a", v, json!({ "n": n }))
            .await
            .unwrap();
    }

    let snap = sub.next().await.expect("latest snapshot");
    assert_eq!(snap.value, json!({"n": 5}));
}

#[tokio::test]
async fn test_delete_ends_subscription() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({})).await.unwrap();

    let mut sub = store.subscribe("rooms/a").await.unwrap();
    let _ = sub.next().await; // initial

    store.delete("rooms/a").await.unwrap();
    assert!(sub.next().await.is_none(), "feed must end after delete");
}

#[tokio::test]
async fn test_subscribe_missing_not_found() {
    let store = MemoryStore::new();
    let result = store.subscribe("rooms/nope").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_offline_store_is_unavailable() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({})).await.unwrap();

    store.set_offline(true);
    assert!(matches!(
        store.get("rooms/a").await,
        Err(StoreError::Unavailable(_))
    ));
    assert!(matches!(
        store.create("rooms/b", json!({})).await,
        Err(StoreError::Unavailable(_))
    ));

    // Back online — reads work again.
    store.set_offline(false);
    assert!(store.get("rooms/a").await.is_ok());
}

#[tokio::test]
async fn test_list_filters_by_prefix() {
    let store = MemoryStore::new();
    store.create("rooms/a", json!({})).await.unwrap();
    store.create("rooms/b", json!({})).await.unwrap();
    store.create("lobby/x", json!({})).await.unwrap();

    let ids = store.list("rooms/").await.unwrap();
    assert_eq!(ids, vec!["rooms/a".to_string(), "rooms/b".to_string()]);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_clones_share_documents() {
    let store = MemoryStore::new();
    let other = store.clone();

    store.create("rooms/a", json!({"n": 1})).await.unwrap();
    let snap = other.get("rooms/a").await.unwrap();
    assert_eq!(snap.value, json!({"n": 1}));
}
