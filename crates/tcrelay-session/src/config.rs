//! Session configuration: who to log in as, where, and what to listen to.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// The `[game]` section of the relay config.
///
/// `version` stays a string here. It is parsed into a
/// [`GameVersion`](tcrelay_protocol::GameVersion) during config
/// validation, where an unknown value is a fatal startup error.
#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    pub realm_host: String,
    #[serde(default = "default_realm_port")]
    pub realm_port: u16,
    /// Exact name of the realm, as the realm list advertises it.
    pub realm_name: String,
    pub username: String,
    pub password: String,
    /// Character to log in as. Messages from this character are never
    /// relayed.
    pub character: String,
    /// Chat channel to join and relay. Matched case-insensitively.
    pub channel: String,
    pub version: String,

    /// Budget for each connect milestone (realm auth, roster, login).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// How often a connected session's health is checked.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_realm_port() -> u16 {
    3724
}

fn default_connect_timeout_secs() -> u64 {
    60
}

fn default_poll_interval_secs() -> u64 {
    1
}

impl SessionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("realm_host", &self.realm_host)
            .field("realm_port", &self.realm_port)
            .field("realm_name", &self.realm_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("character", &self.character)
            .field("channel", &self.channel)
            .field("version", &self.version)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .finish()
    }
}
