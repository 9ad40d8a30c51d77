//! The traits a game protocol implementation provides.
//!
//! The relay needs two things from a protocol library: a way to
//! authenticate and open a world session ([`GameClient`]), and a handle
//! on that session ([`WorldSession`]). How the library does framing,
//! crypto or threading is its own business.
//!
//! # Event delivery
//!
//! Instead of invoking a callback, a session pushes [`ChatEvent`]s into
//! the [`ChatSender`] handed to [`WorldSession::subscribe`]. The relay
//! drains the matching receiver from its supervision loop, so events are
//! processed in arrival order on a single task.

use tokio::sync::mpsc;

use crate::{
    ChatEvent, GameVersion, Opcode, ProtocolError, RealmInfo, RealmList,
    RealmLogin, SessionKey,
};

/// Sending half of the chat event queue.
pub type ChatSender = mpsc::UnboundedSender<ChatEvent>;

/// Entry point into a game protocol implementation.
///
/// Implementations should make every method cancel-safe: the relay wraps
/// each call in a timeout and drops the future when it fires.
pub trait GameClient: Send + Sync + 'static {
    /// The world session type this client opens.
    type Session: WorldSession;

    /// Authenticates against the realm list server and returns the
    /// realms it advertises plus the derived session key.
    ///
    /// # Errors
    /// `LogonChallenge`, `LogonProof`, `Crypto` or `StreamBroken`.
    async fn authenticate(
        &self,
        login: &RealmLogin,
    ) -> Result<RealmList, ProtocolError>;

    /// Opens a world session on `realm` using the key from
    /// [`authenticate`](Self::authenticate).
    async fn open_world(
        &self,
        realm: &RealmInfo,
        account: &str,
        key: &SessionKey,
        version: GameVersion,
    ) -> Result<Self::Session, ProtocolError>;
}

/// A live world-server session.
pub trait WorldSession: Send + 'static {
    /// Waits for the server to send the account's character roster and
    /// returns the character names.
    async fn wait_for_characters(
        &mut self,
    ) -> Result<Vec<String>, ProtocolError>;

    /// Logs in as `character`.
    ///
    /// # Errors
    /// `BadPlayer` if the character is not on the account.
    async fn login(&mut self, character: &str) -> Result<(), ProtocolError>;

    /// Waits until the server confirms the character is in the world.
    async fn wait_for_login_complete(&mut self) -> Result<(), ProtocolError>;

    /// Sends a join request for a custom chat channel.
    async fn join_channel(&mut self, channel: &str)
        -> Result<(), ProtocolError>;

    /// Routes every inbound packet with `opcode` to `events`.
    ///
    /// Subscribing the same sender to several opcodes is allowed; events
    /// then interleave in arrival order.
    fn subscribe(&mut self, opcode: Opcode, events: ChatSender);

    /// Reports the session's health. Returns the error that broke the
    /// session, if any. Must not block.
    fn check_health(&mut self) -> Result<(), ProtocolError>;

    /// Closes the session. Safe to call on a half-open session.
    async fn disconnect(&mut self);
}
