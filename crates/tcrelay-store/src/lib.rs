//! Message storage for tcrelay.
//!
//! Relayed chat lines go into a key-value store as an append-only log:
//!
//! ```text
//! max_id  →  "3"                 (no expiry)
//! "1"     →  "Alice: hi"         (expires after ttl)
//! "2"     →  "Bob: [Thunderfury]"
//! "3"     →  "Alice: gz"
//! ```
//!
//! A consumer polls `max_id` and reads the keys it has not seen yet.
//! Old lines simply expire.
//!
//! # Key types
//!
//! - [`KvStore`]: the two commands the log needs (`GET`, `SET [EX]`)
//! - [`RedisStore`]: `KvStore` over a Redis connection (feature `redis`)
//! - [`MemoryStore`]: in-process `KvStore` for dry runs and tests
//! - [`MessageStore`]: the log itself: counter handling and locking
//! - [`StoreConfig`]: connection parameters and TTL

mod config;
mod error;
mod kv;
mod message_log;
mod memory;
#[cfg(feature = "redis")]
mod redis_store;

pub use config::{StoreBackend, StoreConfig};
pub use error::StoreError;
pub use kv::KvStore;
pub use message_log::{COUNTER_KEY, MessageId, MessageStore};
pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
