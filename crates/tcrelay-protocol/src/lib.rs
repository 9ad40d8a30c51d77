//! Game protocol boundary for tcrelay.
//!
//! tcrelay does not speak the game protocol itself. Realm authentication,
//! key exchange, packet framing and opcode dispatch belong to a protocol
//! library that we treat as a black box. This crate defines the seam:
//!
//! - **Types** ([`ChatEvent`], [`Opcode`], [`ChatMsgType`], [`RealmList`],
//!   etc.): the values that cross the boundary.
//! - **Traits** ([`GameClient`], [`WorldSession`]): what the relay needs
//!   from a protocol implementation.
//! - **Versions** ([`GameVersion`]): the client builds a session can
//!   announce itself as.
//! - **Errors** ([`ProtocolError`]): the failure conditions a protocol
//!   implementation reports.
//!
//! # Architecture
//!
//! ```text
//! Protocol library (external)  ← realm auth, world session, opcodes
//!     ↕  GameClient / WorldSession
//! Session layer (tcrelay-session)  ← connect state machine, chat filter
//!     ↕
//! Store layer (tcrelay-store)  ← monotonic message log
//! ```
//!
//! # Feature Flags
//!
//! - `replay` (default): [`ReplayClient`], a [`GameClient`] that plays
//!   back a JSON-lines capture of chat events instead of talking to a
//!   live server.

#![allow(async_fn_in_trait)]

mod client;
mod error;
#[cfg(feature = "replay")]
mod replay;
mod types;
mod version;

pub use client::{ChatSender, GameClient, WorldSession};
pub use error::ProtocolError;
#[cfg(feature = "replay")]
pub use replay::{ReplayClient, ReplaySession};
pub use types::{
    ChatEvent, ChatMsgType, Opcode, RealmInfo, RealmList, RealmLogin,
    SessionKey,
};
pub use version::GameVersion;
