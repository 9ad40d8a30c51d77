//! Connection status reported by the manager.

use std::fmt;

use crate::ConnectError;

/// Where the [`ConnectionManager`](crate::ConnectionManager) is in its
/// lifecycle.
///
/// ```text
///   Idle ──connect()──→ Connecting ──ok──→ Connected
///                           │                  │
///                         error          stream broken
///                           ▼                  ▼
///                        Failed           Disconnected
///                           └──connect()──→ Connecting
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Connecting,
    Connected,
    Disconnected,
    /// A connect attempt failed. Holds the status line.
    Failed(String),
}

impl Status {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl From<&ConnectError> for Status {
    fn from(err: &ConnectError) -> Self {
        Self::Failed(err.status_line())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Failed(line) => write!(f, "{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_failed_shows_status_line() {
        let status = Status::from(&ConnectError::RealmNotFound("X".into()));
        assert_eq!(status.to_string(), "Realm X not found");
        assert!(!status.is_connected());
    }

    #[test]
    fn test_only_connected_is_connected() {
        assert!(Status::Connected.is_connected());
        assert!(!Status::Connecting.is_connected());
        assert!(!Status::Disconnected.is_connected());
        assert!(!Status::Idle.is_connected());
    }
}
