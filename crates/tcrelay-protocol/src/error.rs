//! Error types for the protocol boundary.
//!
//! These mirror the failure conditions a game protocol library reports.
//! The session layer decides which of them are recoverable; this crate
//! only names them.

/// Errors reported by a [`GameClient`](crate::GameClient) or
/// [`WorldSession`](crate::WorldSession) implementation.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The realm server rejected the logon challenge (unknown account,
    /// banned, wrong build, ...).
    #[error("logon challenge failed: {0}")]
    LogonChallenge(String),

    /// The realm server rejected the logon proof (usually a bad password).
    #[error("logon proof failed: {0}")]
    LogonProof(String),

    /// Key exchange or packet decryption failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The underlying connection broke. This is the condition the
    /// supervision loop watches for once a session is established.
    #[error("stream broken: {0}")]
    StreamBroken(String),

    /// A wait on a server milestone (roster, login complete) gave up.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// The requested character is not on the account.
    #[error("bad player: {0}")]
    BadPlayer(String),

    /// The protocol version string does not name a supported client build.
    #[error("unsupported game version: {0}")]
    UnsupportedVersion(String),

    /// Reading a replay capture failed.
    #[error("replay io: {0}")]
    Io(#[from] std::io::Error),

    /// A replay capture line is not a valid chat event.
    #[cfg(feature = "replay")]
    #[error("replay decode failed at line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    /// Short name of the failure, for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogonChallenge(_) => "logon_challenge",
            Self::LogonProof(_) => "logon_proof",
            Self::Crypto(_) => "crypto",
            Self::StreamBroken(_) => "stream_broken",
            Self::Timeout(_) => "timeout",
            Self::BadPlayer(_) => "bad_player",
            Self::UnsupportedVersion(_) => "unsupported_version",
            Self::Io(_) => "io",
            #[cfg(feature = "replay")]
            Self::Decode { .. } => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = ProtocolError::StreamBroken("peer reset".into());
        assert_eq!(err.to_string(), "stream broken: peer reset");
    }

    #[test]
    fn test_kind_names_variant() {
        assert_eq!(ProtocolError::Timeout("roster").kind(), "timeout");
        assert_eq!(
            ProtocolError::BadPlayer("Bob".into()).kind(),
            "bad_player"
        );
    }
}
