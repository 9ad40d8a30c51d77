//! The reconnect loop that keeps the relay running.

use std::future::Future;
use std::sync::Arc;

use tcrelay_protocol::{GameClient, GameVersion};
use tcrelay_session::{ConnectionManager, SessionError, Status};
use tcrelay_store::{KvStore, MessageStore};

use crate::{Backoff, ReconnectConfig, RelayConfig, RelayError};

/// Drives a [`ConnectionManager`]: connect, supervise, wait, repeat.
///
/// ```text
///        ┌───────────── backoff ◄─────────────┐
///        ▼                                    │
///    connect() ──err──► backoff               │
///        │ ok                                 │
///        ▼                                    │
///   supervise() ──stream broken───────────────┘
///        │
///   store error ──► run ends
/// ```
///
/// Store failures always end the run. Connect and session failures end it
/// only when `reconnect.enabled` is `false`.
pub struct Bridge<C: GameClient, K: KvStore> {
    manager: ConnectionManager<C, K>,
    store: Arc<MessageStore<K>>,
    reconnect: ReconnectConfig,
}

impl<C: GameClient, K: KvStore> Bridge<C, K> {
    pub fn new(
        client: C,
        config: &RelayConfig,
        version: GameVersion,
        store: Arc<MessageStore<K>>,
    ) -> Self {
        let manager = ConnectionManager::new(
            client,
            config.game.clone(),
            version,
            Arc::clone(&store),
        );
        Self {
            manager,
            store,
            reconnect: config.reconnect.clone(),
        }
    }

    pub fn status(&self) -> &Status {
        self.manager.status()
    }

    /// Runs until `shutdown` resolves or a fatal error occurs.
    ///
    /// On shutdown the current session is disconnected and `Ok(())` is
    /// returned.
    pub async fn run(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), RelayError> {
        let outcome = tokio::select! {
            result = self.drive() => Some(result),
            () = shutdown => None,
        };

        match outcome {
            Some(result) => result,
            None => {
                tracing::info!("shutdown requested");
                self.manager.disconnect().await;
                Ok(())
            }
        }
    }

    async fn drive(&mut self) -> Result<(), RelayError> {
        self.store.ensure_counter().await?;
        let mut backoff = Backoff::new(&self.reconnect);

        loop {
            match self.manager.connect().await {
                Ok(()) => {
                    backoff.reset();
                    tracing::info!(
                        channel = %self.manager.config().channel,
                        "relaying"
                    );
                    if let Err(err) = self.manager.supervise().await {
                        match err {
                            SessionError::Store(err) => return Err(err.into()),
                            err if !self.reconnect.enabled => {
                                return Err(err.into());
                            }
                            err => {
                                tracing::debug!(error = %err, "session lost");
                            }
                        }
                    }
                }
                Err(err) if !self.reconnect.enabled => return Err(err.into()),
                Err(_) => {}
            }

            let delay = backoff.next_delay();
            tracing::warn!(
                delay_ms = delay.as_millis() as u64,
                "reconnecting"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
