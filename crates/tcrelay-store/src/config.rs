//! Store configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Which [`KvStore`](crate::KvStore) implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Keep everything in process memory. Nothing survives a restart.
    Memory,
}

/// Connection parameters and retention for the message log.
///
/// Deserialized from the `[store]` section of the relay config. Every
/// field has a default, so an empty section means "local Redis, db 0,
/// keep lines for an hour".
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    /// Redis database index (`SELECT n`).
    pub db: i64,
    pub password: Option<String>,
    /// Lifetime of each stored line, in seconds. Must be non-zero.
    pub ttl_secs: u64,
}

impl StoreConfig {
    /// Per-message expiry as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Redis,
            host: "127.0.0.1".to_string(),
            port: 6379,
            db: 0,
            password: None,
            ttl_secs: 3600,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_local_redis() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::Redis);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.db, 0);
        assert_eq!(config.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = StoreConfig {
            password: Some("hunter2".into()),
            ..StoreConfig::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
