//! Relay configuration, loaded from a TOML file.
//!
//! ```toml
//! [game]
//! realm_host = "logon.example.org"
//! realm_name = "Icecrown"
//! username = "relay"
//! password = "secret"          # or set TCRELAY_PASSWORD
//! character = "Relaybot"
//! channel = "World"
//! version = "3.3.5"
//!
//! [store]
//! backend = "redis"
//! ttl_secs = 3600
//!
//! [reconnect]
//! initial_delay_secs = 5
//! max_delay_secs = 60
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Only `[game]` is required. Everything else has defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tcrelay_protocol::GameVersion;
use tcrelay_session::SessionConfig;
use tcrelay_store::StoreConfig;

/// Environment variable that overrides `game.password`.
pub const PASSWORD_ENV: &str = "TCRELAY_PASSWORD";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// `game.version` names no supported client build. Fatal at startup.
    #[error("unsupported game version {0:?}")]
    UnsupportedVersion(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the relay needs to run.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub game: SessionConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// When and how fast to reconnect.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// `false` makes the first connect or session failure end the run.
    pub enabled: bool,
    pub initial_delay_secs: u64,
    /// Cap for the doubling delay.
    pub max_delay_secs: u64,
    /// Upper bound of the random delay added to each wait.
    pub jitter_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_secs: 5,
            max_delay_secs: 60,
            jitter_ms: 1000,
        }
    }
}

impl ReconnectConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `"warn"` or `"info,tcrelay=debug"`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl RelayConfig {
    /// Reads `path`, parses it, and applies the `TCRELAY_PASSWORD`
    /// override. The result is not validated; call
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let mut config = Self::from_toml(&text)?;
        config.override_password(std::env::var(PASSWORD_ENV).ok());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Replaces the account password when `password` is non-empty.
    pub fn override_password(&mut self, password: Option<String>) {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            self.game.password = password;
        }
    }

    /// Checks the config and resolves the protocol version.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedVersion`] if `game.version` is unknown
    /// - [`ConfigError::Invalid`] for empty names or zero durations
    pub fn validate(&self) -> Result<GameVersion, ConfigError> {
        let version: GameVersion = self
            .game
            .version
            .parse()
            .map_err(|_| ConfigError::UnsupportedVersion(self.game.version.clone()))?;

        let required = [
            ("game.realm_host", &self.game.realm_host),
            ("game.realm_name", &self.game.realm_name),
            ("game.username", &self.game.username),
            ("game.character", &self.game.character),
            ("game.channel", &self.game.channel),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} is empty")));
            }
        }

        if self.game.connect_timeout_secs == 0 {
            return Err(invalid("game.connect_timeout_secs must be > 0"));
        }
        if self.game.poll_interval_secs == 0 {
            return Err(invalid("game.poll_interval_secs must be > 0"));
        }
        if self.store.ttl_secs == 0 {
            return Err(invalid("store.ttl_secs must be > 0"));
        }
        if self.reconnect.max_delay_secs < self.reconnect.initial_delay_secs {
            return Err(invalid(
                "reconnect.max_delay_secs must be >= initial_delay_secs",
            ));
        }

        Ok(version)
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}
