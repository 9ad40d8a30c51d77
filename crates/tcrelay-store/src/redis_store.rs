//! [`KvStore`] over Redis, using the `redis` crate's multiplexed async
//! connection.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

use crate::{KvStore, StoreConfig, StoreError};

/// A Redis-backed [`KvStore`].
///
/// Cloning the inner `MultiplexedConnection` is cheap (it shares one
/// socket), so each command clones it instead of locking.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Connects to the server described by `config` and selects its
    /// database.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: redis::RedisConnectionInfo {
                db: config.db,
                password: config.password.clone(),
                ..Default::default()
            },
        };
        let client = redis::Client::open(info)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::info!(
            host = %config.host,
            port = config.port,
            db = config.db,
            "connected to redis"
        );
        Ok(Self { conn })
    }
}

impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        match ttl {
            // EX only takes whole seconds and rejects 0.
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                    .await?
            }
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }
}
