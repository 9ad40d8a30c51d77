//! The connection manager: one authenticated chat session, supervised.
//!
//! The connect sequence is a chain of milestones, each with its own
//! failure mapping:
//!
//! ```text
//! authenticate ──→ find realm ──→ open world ──→ roster ──→ login
//!   (timeout)       (missing)      (timeout)    (timeout)  (bad player)
//!                                                              │
//!                 subscribe ←── join channel ←── login complete┘
//!                                                  (timeout)
//! ```
//!
//! Once a world session exists, every failure path disconnects it before
//! returning. Nothing is retried here; the bridge above decides when to
//! call [`connect`](ConnectionManager::connect) again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tcrelay_protocol::{
    ChatEvent, GameClient, GameVersion, Opcode, ProtocolError, RealmLogin,
    WorldSession,
};
use tcrelay_store::{KvStore, MessageStore};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::{
    ChatHandler, ConnectError, SessionConfig, SessionError, Status,
};

/// Owns the game session and relays its chat into the message store.
pub struct ConnectionManager<C: GameClient, K: KvStore> {
    /// The protocol library. Kept for the manager's whole life so every
    /// reconnect goes through the same client; only sessions are
    /// replaced.
    client: C,
    config: SessionConfig,
    /// Client build announced to the world server. Parsed once at
    /// startup, so an unsupported version never reaches this point.
    version: GameVersion,
    /// Filters and stores chat events. Outlives sessions: the same
    /// handler and message log serve every reconnect.
    handler: ChatHandler<K>,
    /// Last status set by `connect`, `supervise` or `disconnect`.
    status: Status,
    /// The live world session. `Some` only while `Connected`.
    session: Option<C::Session>,
    /// Chat events pushed by `session`.
    events: Option<mpsc::UnboundedReceiver<ChatEvent>>,
}

impl<C: GameClient, K: KvStore> ConnectionManager<C, K> {
    /// Creates an idle manager. Nothing connects until
    /// [`connect`](Self::connect) is called.
    pub fn new(
        client: C,
        config: SessionConfig,
        version: GameVersion,
        store: Arc<MessageStore<K>>,
    ) -> Self {
        let handler =
            ChatHandler::new(&config.channel, &config.character, store);
        Self {
            client,
            config,
            version,
            handler,
            status: Status::Idle,
            session: None,
            events: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Returns `true` while a world session is up.
    pub fn is_connected(&self) -> bool {
        self.status.is_connected() && self.session.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs the full connect sequence.
    ///
    /// Any session from a previous attempt is disconnected first. On
    /// success the manager is `Connected` and chat events are queued for
    /// [`supervise`](Self::supervise).
    ///
    /// # Errors
    /// A [`ConnectError`] naming the milestone that failed. The status is
    /// set to its status line.
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        self.teardown().await;
        self.set_status(Status::Connecting);

        match self.open_session().await {
            Ok((session, events)) => {
                self.session = Some(session);
                self.events = Some(events);
                self.set_status(Status::Connected);
                Ok(())
            }
            Err(err) => {
                log_failure(&err);
                self.set_status(Status::from(&err));
                Err(err)
            }
        }
    }

    /// Watches the connected session until it fails.
    ///
    /// Checks session health every `poll_interval_secs` and relays chat
    /// events as they arrive. Never returns `Ok`; the session is torn
    /// down and the status set to `Disconnected` before any error is
    /// returned.
    ///
    /// # Errors
    /// - [`SessionError::NotConnected`] if there is no session
    /// - [`SessionError::StreamBroken`] when the session reports a failure
    /// - [`SessionError::Store`] if a relayed message could not be stored
    pub async fn supervise(&mut self) -> Result<(), SessionError> {
        if self.session.is_none() {
            return Err(SessionError::NotConnected);
        }

        let result = self.watch().await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "supervision ended");
            self.teardown().await;
            self.set_status(Status::Disconnected);
        }
        result
    }

    /// Disconnects the current session, if any.
    pub async fn disconnect(&mut self) {
        if self.session.is_some() {
            self.teardown().await;
            self.set_status(Status::Disconnected);
        }
    }

    async fn watch(&mut self) -> Result<(), SessionError> {
        let Self {
            session,
            events,
            handler,
            config,
            ..
        } = self;
        let session = session.as_mut().ok_or(SessionError::NotConnected)?;

        let period = config.poll_interval().max(Duration::from_millis(1));
        let mut poll = time::interval(period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    session
                        .check_health()
                        .map_err(SessionError::StreamBroken)?;
                }
                Some(event) = next_event(events) => {
                    handler.handle(&event).await?;
                }
            }
        }
    }

    async fn open_session(
        &self,
    ) -> Result<(C::Session, mpsc::UnboundedReceiver<ChatEvent>), ConnectError>
    {
        let login = RealmLogin {
            host: self.config.realm_host.clone(),
            port: self.config.realm_port,
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            version: self.version,
        };

        let realms = match self.bounded(self.client.authenticate(&login)).await
        {
            None => return Err(ConnectError::RealmTimeout),
            Some(Err(err)) => return Err(ConnectError::RealmAuthFailed(err)),
            Some(Ok(realms)) => realms,
        };

        let realm = realms.find(&self.config.realm_name).ok_or_else(|| {
            ConnectError::RealmNotFound(self.config.realm_name.clone())
        })?;
        tracing::debug!(
            realm = %realm.name,
            host = %realm.host,
            port = realm.port,
            "realm selected"
        );

        let open = self.client.open_world(
            realm,
            &self.config.username,
            &realms.session_key,
            self.version,
        );
        let mut session = match self.bounded(open).await {
            None => return Err(ConnectError::WorldTimeout),
            Some(Err(err)) => return Err(ConnectError::WorldFailed(err)),
            Some(Ok(session)) => session,
        };

        match self.enter_world(&mut session).await {
            Ok(events) => Ok((session, events)),
            Err(err) => {
                session.disconnect().await;
                Err(err)
            }
        }
    }

    /// Roster, login, channel join, subscriptions. The caller disconnects
    /// `session` if this fails.
    async fn enter_world(
        &self,
        session: &mut C::Session,
    ) -> Result<mpsc::UnboundedReceiver<ChatEvent>, ConnectError> {
        let character = &self.config.character;

        let roster = match self.bounded(session.wait_for_characters()).await {
            None | Some(Err(ProtocolError::Timeout(_))) => {
                return Err(ConnectError::WorldTimeout);
            }
            Some(Err(err)) => return Err(ConnectError::WorldFailed(err)),
            Some(Ok(roster)) => roster,
        };
        let wanted = character.to_lowercase();
        if !roster.iter().any(|name| name.to_lowercase() == wanted) {
            return Err(ConnectError::UnknownCharacter(character.clone()));
        }

        match self.bounded(session.login(character)).await {
            None => return Err(ConnectError::LoginTimeout),
            Some(Err(ProtocolError::BadPlayer(_))) => {
                return Err(ConnectError::UnknownCharacter(character.clone()));
            }
            Some(Err(err)) => return Err(ConnectError::LoginFailed(err)),
            Some(Ok(())) => {}
        }

        match self.bounded(session.wait_for_login_complete()).await {
            None | Some(Err(ProtocolError::Timeout(_))) => {
                return Err(ConnectError::LoginTimeout);
            }
            Some(Err(err)) => return Err(ConnectError::LoginFailed(err)),
            Some(Ok(())) => {}
        }

        session
            .join_channel(&self.config.channel)
            .await
            .map_err(ConnectError::WorldFailed)?;

        let (tx, rx) = mpsc::unbounded_channel();
        session.subscribe(Opcode::MessageChat, tx.clone());
        session.subscribe(Opcode::GmMessageChat, tx);
        Ok(rx)
    }

    /// Runs `fut` under the connect budget. `None` means it timed out and
    /// was dropped.
    async fn bounded<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        time::timeout(self.config.connect_timeout(), fut).await.ok()
    }

    async fn teardown(&mut self) {
        self.events = None;
        if let Some(mut session) = self.session.take() {
            session.disconnect().await;
        }
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
        tracing::warn!(status = %self.status, "relay status");
    }
}

async fn next_event(
    events: &mut Option<mpsc::UnboundedReceiver<ChatEvent>>,
) -> Option<ChatEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

fn log_failure(err: &ConnectError) {
    use std::error::Error;

    match err.source().and_then(|s| s.downcast_ref::<ProtocolError>()) {
        Some(cause) => tracing::debug!(
            kind = cause.kind(),
            error = %cause,
            "connect attempt failed: {err}"
        ),
        None => tracing::debug!(error = %err, "connect attempt failed"),
    }
}
