//! The append-only message log.
//!
//! # Concurrency note
//!
//! `save` is a read-increment-write on a shared counter, which is not
//! atomic on the key-value side. The store owns a `tokio::sync::Mutex`
//! and holds it for the whole sequence, so concurrent callers inside this
//! process never hand out the same id. Two relay processes writing to the
//! same database would still race; run one relay per database.

use std::fmt;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{KvStore, StoreError};

/// Key holding the id of the newest message.
pub const COUNTER_KEY: &str = "max_id";

/// Id assigned to a stored message. Ids start at 1 and never repeat for
/// the lifetime of the counter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Creates a `MessageId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }

    /// The key the message is stored under.
    pub fn key(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic, TTL-bounded message log on top of a [`KvStore`].
pub struct MessageStore<K: KvStore> {
    /// Backing store. Holds the counter plus one key per live message.
    kv: K,
    /// Applied to message keys only. The counter never expires.
    ttl: Duration,
    /// Serializes `save` calls. Guards no data of its own; the state it
    /// protects lives in the key-value store.
    write_lock: Mutex<()>,
}

impl<K: KvStore> MessageStore<K> {
    /// Wraps `kv`. Every saved message expires after `ttl`.
    pub fn new(kv: K, ttl: Duration) -> Self {
        Self {
            kv,
            ttl,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates the counter key with value 0 if it does not exist yet.
    /// Leaves an existing counter alone.
    pub async fn ensure_counter(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.kv.get(COUNTER_KEY).await?.is_none() {
            self.kv.set(COUNTER_KEY, "0", None).await?;
            tracing::debug!("initialized message counter");
        }
        Ok(())
    }

    /// Appends `message` and returns the id it was stored under.
    ///
    /// The message is written first, then the counter. If the counter is
    /// missing it counts as 0.
    ///
    /// # Errors
    /// Any backing-store failure, [`StoreError::CorruptCounter`] if the
    /// counter is not a number, [`StoreError::CounterOverflow`] at
    /// `u64::MAX`.
    pub async fn save(&self, message: &str) -> Result<MessageId, StoreError> {
        let _guard = self.write_lock.lock().await;

        let current = self.read_counter().await?;
        let next = current
            .checked_add(1)
            .map(MessageId)
            .ok_or(StoreError::CounterOverflow)?;

        self.kv.set(&next.key(), message, Some(self.ttl)).await?;
        self.kv.set(COUNTER_KEY, &next.key(), None).await?;

        tracing::debug!(id = %next, len = message.len(), "message stored");
        Ok(next)
    }

    /// Id of the newest stored message, or `None` if nothing was saved yet.
    pub async fn last_id(&self) -> Result<Option<MessageId>, StoreError> {
        let current = self.read_counter().await?;
        Ok((current > 0).then_some(MessageId(current)))
    }

    /// The backing key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    async fn read_counter(&self) -> Result<u64, StoreError> {
        match self.kv.get(COUNTER_KEY).await? {
            None => Ok(0),
            Some(raw) => raw.trim().parse().map_err(|_| {
                StoreError::CorruptCounter {
                    key: COUNTER_KEY,
                    value: raw,
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn store() -> MessageStore<MemoryStore> {
        MessageStore::new(MemoryStore::new(), Duration::from_secs(60))
    }

    #[test]
    fn test_message_id_key_and_display() {
        let id = MessageId::new(42);
        assert_eq!(id.key(), "42");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.into_inner(), 42);
    }

    #[tokio::test]
    async fn test_ensure_counter_creates_zero() {
        let store = store();
        store.ensure_counter().await.unwrap();
        assert_eq!(
            store.kv().get(COUNTER_KEY).await.unwrap().as_deref(),
            Some("0")
        );
        assert_eq!(store.last_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_counter_keeps_existing_value() {
        let store = store();
        store.kv().set(COUNTER_KEY, "17", None).await.unwrap();

        store.ensure_counter().await.unwrap();
        store.ensure_counter().await.unwrap();

        assert_eq!(
            store.kv().get(COUNTER_KEY).await.unwrap().as_deref(),
            Some("17")
        );
    }

    #[tokio::test]
    async fn test_save_without_counter_starts_at_one() {
        let store = store();
        let id = store.save("Alice: hi").await.unwrap();
        assert_eq!(id, MessageId::new(1));
        assert_eq!(
            store.kv().get("1").await.unwrap().as_deref(),
            Some("Alice: hi")
        );
    }

    #[tokio::test]
    async fn test_save_continues_from_existing_counter() {
        let store = store();
        store.kv().set(COUNTER_KEY, "41", None).await.unwrap();

        let id = store.save("x").await.unwrap();

        assert_eq!(id, MessageId::new(42));
        assert_eq!(store.last_id().await.unwrap(), Some(MessageId::new(42)));
    }

    #[tokio::test]
    async fn test_save_corrupt_counter_returns_error() {
        let store = store();
        store.kv().set(COUNTER_KEY, "lots", None).await.unwrap();

        let result = store.save("x").await;

        assert!(matches!(
            result,
            Err(StoreError::CorruptCounter { value, .. }) if value == "lots"
        ));
        assert_eq!(store.kv().get("1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_at_max_counter_returns_overflow() {
        let store = store();
        store
            .kv()
            .set(COUNTER_KEY, &u64::MAX.to_string(), None)
            .await
            .unwrap();

        let result = store.save("x").await;

        assert!(matches!(result, Err(StoreError::CounterOverflow)));
    }
}
