//! Values that cross the protocol boundary.
//!
//! Everything here is plain data. A protocol implementation produces
//! [`RealmList`]s and [`ChatEvent`]s; the session layer consumes them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GameVersion;

// ---------------------------------------------------------------------------
// Opcodes and chat types
// ---------------------------------------------------------------------------

/// Server packet opcode relevant to chat.
///
/// Only the two chat opcodes get names; every other opcode is carried
/// as `Other` so that a protocol implementation can forward whatever it
/// receives and leave filtering to the session layer. Raw values are the
/// 3.3.5 ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// `SMSG_MESSAGECHAT`
    MessageChat,
    /// `SMSG_GM_MESSAGECHAT` (same payload, sent for GM senders)
    GmMessageChat,
    Other(u16),
}

impl Opcode {
    const MESSAGE_CHAT: u16 = 0x096;
    const GM_MESSAGE_CHAT: u16 = 0x3B3;

    /// Maps a raw opcode number to an `Opcode`.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            Self::MESSAGE_CHAT => Self::MessageChat,
            Self::GM_MESSAGE_CHAT => Self::GmMessageChat,
            other => Self::Other(other),
        }
    }

    /// Returns the raw opcode number.
    pub fn raw(self) -> u16 {
        match self {
            Self::MessageChat => Self::MESSAGE_CHAT,
            Self::GmMessageChat => Self::GM_MESSAGE_CHAT,
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` for the two opcodes that carry chat messages.
    pub fn is_chat(self) -> bool {
        matches!(self, Self::MessageChat | Self::GmMessageChat)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.raw())
    }
}

/// The chat message type field of a message-chat packet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChatMsgType {
    Say,
    Party,
    Guild,
    Yell,
    Whisper,
    Emote,
    /// Custom chat channel (`/join <name>`). The only type the relay
    /// forwards.
    Channel,
    Other(u8),
}

impl ChatMsgType {
    /// Maps a raw `CHAT_MSG_*` value to a `ChatMsgType`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0x01 => Self::Say,
            0x02 => Self::Party,
            0x04 => Self::Guild,
            0x06 => Self::Yell,
            0x07 => Self::Whisper,
            0x0A => Self::Emote,
            0x11 => Self::Channel,
            other => Self::Other(other),
        }
    }

    /// Returns the raw `CHAT_MSG_*` value.
    pub fn raw(self) -> u8 {
        match self {
            Self::Say => 0x01,
            Self::Party => 0x02,
            Self::Guild => 0x04,
            Self::Yell => 0x06,
            Self::Whisper => 0x07,
            Self::Emote => 0x0A,
            Self::Channel => 0x11,
            Self::Other(raw) => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatEvent
// ---------------------------------------------------------------------------

/// One inbound chat packet, as delivered by a [`WorldSession`](crate::WorldSession).
///
/// `sender` and `body` are the raw bytes from the wire. The game client
/// sends UTF-8, but nothing guarantees it, so decoding is left to the
/// consumer. In JSON (replay captures) both are plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub opcode: Opcode,
    pub msg_type: ChatMsgType,
    /// Channel name. Empty for message types that have no channel.
    #[serde(default)]
    pub channel: String,
    #[serde(with = "text_bytes")]
    pub sender: Vec<u8>,
    #[serde(with = "text_bytes")]
    pub body: Vec<u8>,
}

impl ChatEvent {
    /// Builds a plain channel message (`SMSG_MESSAGECHAT`, `CHAT_MSG_CHANNEL`).
    pub fn channel_message(
        channel: impl Into<String>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            opcode: Opcode::MessageChat,
            msg_type: ChatMsgType::Channel,
            channel: channel.into(),
            sender: sender.into().into_bytes(),
            body: body.into().into_bytes(),
        }
    }

    /// Sender name decoded as UTF-8, invalid sequences replaced.
    pub fn sender_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.sender)
    }

    /// Message body decoded as UTF-8, invalid sequences replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Serializes `Vec<u8>` as a string so captures stay human-editable.
mod text_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &[u8],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        String::deserialize(deserializer).map(String::into_bytes)
    }
}

// ---------------------------------------------------------------------------
// Realm types
// ---------------------------------------------------------------------------

/// Everything needed to authenticate against a realm list server.
#[derive(Clone)]
pub struct RealmLogin {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub version: GameVersion,
}

impl fmt::Debug for RealmLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealmLogin")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

/// Connection info for one realm, as advertised by the realm list server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmInfo {
    pub id: u32,
    pub name: String,
    pub host: String,
    pub port: u16,
}

/// Shared secret derived during realm authentication. The world server
/// uses it to verify the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey(pub Vec<u8>);

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey(<{} bytes>)", self.0.len())
    }
}

/// Result of a successful realm authentication.
#[derive(Debug, Clone)]
pub struct RealmList {
    /// Realms keyed by their exact advertised name.
    pub realms: HashMap<String, RealmInfo>,
    pub session_key: SessionKey,
}

impl RealmList {
    /// Builds a realm list from an iterator of realms.
    pub fn new(
        realms: impl IntoIterator<Item = RealmInfo>,
        session_key: SessionKey,
    ) -> Self {
        Self {
            realms: realms
                .into_iter()
                .map(|realm| (realm.name.clone(), realm))
                .collect(),
            session_key,
        }
    }

    /// Looks up a realm by its exact name.
    pub fn find(&self, name: &str) -> Option<&RealmInfo> {
        self.realms.get(name)
    }
}
