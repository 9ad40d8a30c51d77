//! Game session management for tcrelay.
//!
//! This crate owns everything between "we have a protocol library" and
//! "a line lands in the store":
//!
//! 1. **Connecting**: realm login, realm lookup, world session, character
//!    login, channel join ([`ConnectionManager::connect`])
//! 2. **Supervising**: watching the session's health and draining chat
//!    events ([`ConnectionManager::supervise`])
//! 3. **Filtering**: deciding which chat events are relayed
//!    ([`ChatHandler`])
//! 4. **Sanitizing**: stripping client markup from message text
//!    ([`sanitize`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Bridge (tcrelay, above)  ← reconnect loop, backoff
//!     ↕
//! Session layer (this crate)  ← connect state machine, chat forwarding
//!     ↕                ↕
//! Protocol boundary    Message store
//! ```

mod config;
mod error;
mod handler;
mod manager;
mod sanitize;
mod status;

pub use config::SessionConfig;
pub use error::{ConnectError, SessionError};
pub use handler::ChatHandler;
pub use manager::ConnectionManager;
pub use sanitize::sanitize;
pub use status::Status;
