//! Error types for the store layer.

/// Errors that can occur while reading or appending to the message log.
///
/// None of these are retried inside the store. A failed `save` leaves the
/// counter untouched unless the failure hit the final counter write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The Redis server could not be reached or rejected a command.
    #[cfg(feature = "redis")]
    #[error("redis: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// The counter key holds something that is not an unsigned integer.
    /// Another process wrote to the key, or the database index is wrong.
    #[error("counter key {key:?} holds non-numeric value {value:?}")]
    CorruptCounter { key: &'static str, value: String },

    /// The counter reached `u64::MAX`.
    #[error("message counter overflowed")]
    CounterOverflow,
}
