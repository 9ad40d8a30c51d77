//! # tcrelay
//!
//! Relays chat from one channel of a game world into a key-value message
//! log, for another process to pick up.
//!
//! The work is split across the workspace:
//!
//! - `tcrelay-protocol`: the seam to the game protocol library
//! - `tcrelay-store`: the monotonic, expiring message log
//! - `tcrelay-session`: connecting, supervising, filtering, sanitizing
//! - this crate: configuration, the reconnect loop ([`Bridge`]), logging
//!   and the `tcrelay` binary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tcrelay::prelude::*;
//!
//! # async fn run() -> Result<(), RelayError> {
//! let config = RelayConfig::load("tcrelay.toml")?;
//! let version = config.validate()?;
//! let store = std::sync::Arc::new(MessageStore::new(
//!     MemoryStore::new(),
//!     config.store.ttl(),
//! ));
//! let client = ReplayClient::new(
//!     "capture.jsonl",
//!     config.game.realm_name.clone(),
//!     vec![config.game.character.clone()],
//! );
//! let bridge = Bridge::new(client, &config, version, store);
//! bridge.run(std::future::pending()).await
//! # }
//! ```

mod backoff;
mod bridge;
mod config;
mod error;
pub mod logging;

pub use backoff::Backoff;
pub use bridge::Bridge;
pub use config::{
    ConfigError, LoggingConfig, PASSWORD_ENV, ReconnectConfig, RelayConfig,
};
pub use error::RelayError;

pub mod prelude {
    pub use crate::{Backoff, Bridge, ConfigError, RelayConfig, RelayError};
    pub use tcrelay_protocol::{
        ChatEvent, GameClient, GameVersion, ReplayClient, WorldSession,
    };
    pub use tcrelay_session::{ConnectionManager, SessionConfig, Status};
    pub use tcrelay_store::{
        KvStore, MemoryStore, MessageId, MessageStore, StoreConfig,
    };
}
