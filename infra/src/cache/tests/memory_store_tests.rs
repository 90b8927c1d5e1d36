//! Unit tests for the in-process token store

use std::time::Duration;

use tg_core::repositories::TokenStore;

use crate::cache::InMemoryTokenStore;

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_hset_merges_fields() {
    let store = InMemoryTokenStore::new();

    store
        .hset("auth:a", &fields(&[("id", "1"), ("type", "ACCESS")]))
        .await
        .unwrap();
    store
        .hset("auth:a", &fields(&[("expired", "99")]))
        .await
        .unwrap();

    let map = store.hgetall("auth:a").await.unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("id").map(String::as_str), Some("1"));
    assert_eq!(map.get("expired").map(String::as_str), Some("99"));
}

#[tokio::test]
async fn test_missing_key_is_empty() {
    let store = InMemoryTokenStore::new();
    assert!(store.hgetall("auth:nothing").await.unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = InMemoryTokenStore::new();
    store.hset("auth:a", &fields(&[("id", "1")])).await.unwrap();

    store.delete("auth:a").await.unwrap();
    store.delete("auth:a").await.unwrap();

    assert!(store.hgetall("auth:a").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_ttl_evicts_key() {
    let store = InMemoryTokenStore::new();
    store
        .hset_with_ttl("auth:a", &fields(&[("id", "1")]), 2)
        .await
        .unwrap();

    tokio::time::advance(Duration::from_millis(1500)).await;
    assert_eq!(store.len(), 1);
    assert!(!store.hgetall("auth:a").await.unwrap().is_empty());

    tokio::time::advance(Duration::from_millis(600)).await;
    assert!(store.hgetall("auth:a").await.unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expire_rearms_ttl() {
    let store = InMemoryTokenStore::new();
    store
        .hset_with_ttl("auth:a", &fields(&[("id", "1")]), 2)
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(1)).await;
    store.expire("auth:a", 10).await.unwrap();

    tokio::time::advance(Duration::from_secs(5)).await;
    assert!(!store.hgetall("auth:a").await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_expired_key_is_recreated_fresh() {
    let store = InMemoryTokenStore::new();
    store
        .hset_with_ttl("auth:a", &fields(&[("id", "1"), ("scope", "admin")]), 1)
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(2)).await;
    store.hset("auth:a", &fields(&[("id", "2")])).await.unwrap();

    let map = store.hgetall("auth:a").await.unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("id").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_non_positive_ttl_deletes() {
    let store = InMemoryTokenStore::new();
    store.hset("auth:a", &fields(&[("id", "1")])).await.unwrap();

    store.expire("auth:a", 0).await.unwrap();
    assert!(store.hgetall("auth:a").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expire_on_missing_key_is_noop() {
    let store = InMemoryTokenStore::new();
    store.expire("auth:none", 10).await.unwrap();
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_huge_ttl_does_not_overflow() {
    let store = InMemoryTokenStore::new();
    store
        .hset_with_ttl("auth:a", &fields(&[("id", "1")]), i64::MAX)
        .await
        .unwrap();
    assert!(!store.hgetall("auth:a").await.unwrap().is_empty());
}
