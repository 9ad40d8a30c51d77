//! Unified error type for the relay.

use tcrelay_protocol::ProtocolError;
use tcrelay_session::{ConnectError, SessionError};
use tcrelay_store::StoreError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// Whatever ends a run ends up here, and [`exit_code`](Self::exit_code)
/// turns it into the process exit status.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A connect attempt failed and reconnecting is disabled.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// A connected session failed and reconnecting is disabled.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The message store failed. Always fatal.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The binary was started without a game client to drive.
    #[error("no live game protocol client is bundled; pass --replay <capture>")]
    NoClient,
}

impl RelayError {
    /// Process exit status for this error: 3 for an unsupported protocol
    /// version, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(ConfigError::UnsupportedVersion(_)) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::Invalid("game.channel is empty".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Config(_)));
        assert!(relay_err.to_string().contains("game.channel"));
        assert_eq!(relay_err.exit_code(), 1);
    }

    #[test]
    fn test_unsupported_version_exits_with_three() {
        let relay_err: RelayError =
            ConfigError::UnsupportedVersion("9.9.9".into()).into();
        assert_eq!(relay_err.exit_code(), 3);
    }

    #[test]
    fn test_from_connect_error() {
        let err = ConnectError::RealmNotFound("Icecrown".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Connect(_)));
        assert!(relay_err.to_string().contains("Icecrown"));
    }

    #[test]
    fn test_from_session_error() {
        let relay_err: RelayError = SessionError::NotConnected.into();
        assert!(matches!(relay_err, RelayError::Session(_)));
        assert_eq!(relay_err.exit_code(), 1);
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::CounterOverflow;
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Store(_)));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::StreamBroken("reset".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Protocol(_)));
    }
}
