//! In-process [`KvStore`].
//!
//! Behaves like a single Redis database for the two commands the log
//! uses. A read never returns an expired key, and every write first
//! evicts whatever has expired so far, so a relay that only ever writes
//! new keys still holds just the live ones. Time comes from
//! `tokio::time`, so tests with a paused clock can step over TTLs
//! without sleeping.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{KvStore, StoreError};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, Entry>,
    /// Soonest deadline first. A key rewritten with a new expiry leaves
    /// its old deadline behind; eviction skips deadlines that no longer
    /// match the entry.
    deadlines: BinaryHeap<Reverse<(Instant, String)>>,
}

impl State {
    fn evict_expired(&mut self, now: Instant) {
        while let Some(Reverse((at, _))) = self.deadlines.peek() {
            if *at > now {
                break;
            }
            let Some(Reverse((at, key))) = self.deadlines.pop() else {
                break;
            };
            if self
                .entries
                .get(&key)
                .is_some_and(|e| e.expires_at == Some(at))
            {
                self.entries.remove(&key);
            }
        }
    }
}

/// A [`KvStore`] that keeps everything in a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of `key`. `None` if the key is absent, expired,
    /// or has no expiry.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let state = self.state.lock().await;
        state
            .entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let state = self.state.lock().await;
        state.entries.values().filter(|e| e.is_live(now)).count()
    }

    /// Returns `true` if no live keys remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        match state.entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                state.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);
        let mut state = self.state.lock().await;

        state.evict_expired(now);
        if let Some(at) = expires_at {
            state.deadlines.push(Reverse((at, key.to_string())));
        }
        state.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.ttl("k").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_expires_after_ttl() {
        let store = MemoryStore::new();
        store
            .set("k", "v", Some(Duration::from_secs(10)))
            .await
            .unwrap();
        assert_eq!(store.ttl("k").await, Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(store.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_without_ttl_clears_expiry() {
        let store = MemoryStore::new();
        store
            .set("k", "old", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        store.set("k", "new", None).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }

    async fn held(store: &MemoryStore) -> (usize, usize) {
        let state = store.state.lock().await;
        (state.entries.len(), state.deadlines.len())
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_evicts_expired_keys_never_read_again() {
        let store = MemoryStore::new();
        store.set("max_id", "0", None).await.unwrap();

        for i in 1..=1_000 {
            store
                .set(&i.to_string(), "line", Some(Duration::from_secs(1)))
                .await
                .unwrap();
            tokio::time::advance(Duration::from_secs(2)).await;
        }
        store.set("max_id", "1000", None).await.unwrap();

        // Only the counter is left, in the map and in the deadline queue.
        assert_eq!(store.len().await, 1);
        assert_eq!(held(&store).await, (1, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_keeps_rewritten_key_past_its_old_deadline() {
        let store = MemoryStore::new();
        store
            .set("k", "old", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        store
            .set("k", "new", Some(Duration::from_secs(10)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        store.set("other", "x", None).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(held(&store).await, (2, 1));
    }
}
