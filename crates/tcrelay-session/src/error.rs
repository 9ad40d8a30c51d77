//! Error types for the session layer.

use tcrelay_protocol::ProtocolError;
use tcrelay_store::StoreError;

/// Why a [`connect`](crate::ConnectionManager::connect) attempt failed.
///
/// Every variant is recoverable: the caller is expected to wait and try
/// again. Each one maps to the status line the manager reports
/// ([`status_line`](Self::status_line)).
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The realm list server did not finish authentication in time.
    #[error("realm authentication timed out")]
    RealmTimeout,

    /// The realm list server rejected us (challenge, proof, crypto) or the
    /// stream broke during authentication.
    #[error("realm authentication failed: {0}")]
    RealmAuthFailed(#[source] ProtocolError),

    /// Authentication worked but the configured realm is not listed.
    #[error("realm {0} not found")]
    RealmNotFound(String),

    /// The world server did not send the character roster in time.
    #[error("world server timed out")]
    WorldTimeout,

    /// Opening the world session, fetching the roster, or joining the
    /// channel failed.
    #[error("world server failed: {0}")]
    WorldFailed(#[source] ProtocolError),

    /// The configured character is not on the account.
    #[error("character {0} not found")]
    UnknownCharacter(String),

    /// The world server did not confirm the login in time.
    #[error("login timed out")]
    LoginTimeout,

    /// The stream broke while waiting for login confirmation.
    #[error("login failed: {0}")]
    LoginFailed(#[source] ProtocolError),
}

impl ConnectError {
    /// The human-readable status line for this failure.
    pub fn status_line(&self) -> String {
        match self {
            Self::RealmTimeout | Self::RealmAuthFailed(_) => {
                "Unable to connect to Realm List Server; Reconnecting".into()
            }
            Self::RealmNotFound(name) => format!("Realm {name} not found"),
            Self::WorldTimeout
            | Self::WorldFailed(_)
            | Self::LoginTimeout
            | Self::LoginFailed(_) => {
                "Unable to connect to World Server; Reconnecting".into()
            }
            Self::UnknownCharacter(name) => {
                format!("Character {name} not found; Reconnecting")
            }
        }
    }
}

/// Errors that end [`supervise`](crate::ConnectionManager::supervise).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `supervise` was called without a connected session.
    #[error("no connected session")]
    NotConnected,

    /// The world session broke. Reconnecting is the caller's call.
    #[error("session lost: {0}")]
    StreamBroken(#[source] ProtocolError),

    /// Storing a relayed message failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
