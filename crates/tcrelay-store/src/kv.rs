//! The key-value seam.
//!
//! The message log needs exactly two commands, so that is all this trait
//! asks for. Anything that can do `GET` and `SET key value [EX ttl]` on
//! string keys can back the log.

use std::time::Duration;

use crate::StoreError;

/// A string key-value store with optional per-key expiry.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → one store is shared by every task that
///   saves messages.
/// - The returned futures are `Send` so that `save` can run inside
///   `tokio::spawn`.
pub trait KvStore: Send + Sync + 'static {
    /// Returns the value at `key`, or `None` if it is absent or expired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>
    + Send;

    /// Sets `key` to `value`. With `ttl`, the key expires after that long;
    /// without it, any previous expiry is cleared.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
