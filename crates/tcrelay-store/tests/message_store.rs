//! Integration tests for the message log over the in-memory backend.
//!
//! Covers the ordering guarantees a consumer depends on: ids are dense
//! and in call order, concurrent writers never collide, message keys
//! expire while the counter does not.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tcrelay_store::{
    COUNTER_KEY, KvStore, MemoryStore, MessageId, MessageStore,
};

fn store(ttl_secs: u64) -> MessageStore<MemoryStore> {
    MessageStore::new(MemoryStore::new(), Duration::from_secs(ttl_secs))
}

#[tokio::test]
async fn test_sequential_saves_assign_dense_ids_in_order() {
    let store = store(60);
    store.ensure_counter().await.unwrap();

    let mut ids = Vec::new();
    for n in 1..=25 {
        ids.push(store.save(&format!("line {n}")).await.unwrap());
    }

    let expected: Vec<MessageId> = (1..=25).map(MessageId::new).collect();
    assert_eq!(ids, expected);
    assert_eq!(
        store.kv().get(COUNTER_KEY).await.unwrap().as_deref(),
        Some("25")
    );
    for n in 1..=25u64 {
        assert_eq!(
            store.kv().get(&n.to_string()).await.unwrap(),
            Some(format!("line {n}"))
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_lose_no_updates() {
    const N: u64 = 200;
    let store = Arc::new(store(60));
    store.ensure_counter().await.unwrap();

    let tasks = (0..N).map(|n| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.save(&format!("msg {n}")).await })
    });
    let ids: Vec<MessageId> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("save failed"))
        .collect();

    let distinct: HashSet<u64> = ids.iter().map(|id| id.into_inner()).collect();
    assert_eq!(distinct.len() as u64, N, "ids must not repeat");
    assert_eq!(distinct, (1..=N).collect::<HashSet<u64>>());
    assert_eq!(
        store.kv().get(COUNTER_KEY).await.unwrap(),
        Some(N.to_string())
    );
    // N message keys plus the counter.
    assert_eq!(store.kv().len().await as u64, N + 1);
}

#[tokio::test(start_paused = true)]
async fn test_messages_expire_but_counter_survives() {
    let store = store(30);
    store.ensure_counter().await.unwrap();
    store.save("Alice: first").await.unwrap();

    assert_eq!(store.kv().ttl("1").await, Some(Duration::from_secs(30)));
    assert_eq!(store.kv().ttl(COUNTER_KEY).await, None);

    tokio::time::advance(Duration::from_secs(31)).await;

    assert_eq!(store.kv().get("1").await.unwrap(), None);
    assert_eq!(store.last_id().await.unwrap(), Some(MessageId::new(1)));

    // Ids keep counting after the old entries are gone.
    assert_eq!(store.save("Bob: second").await.unwrap(), MessageId::new(2));
}
