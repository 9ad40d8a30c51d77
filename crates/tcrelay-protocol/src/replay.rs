//! A [`GameClient`] that plays back a capture file.
//!
//! The capture is JSON lines, one [`ChatEvent`] per line. Blank lines and
//! lines starting with `#` are skipped:
//!
//! ```text
//! # captured on Icecrown, channel "world"
//! {"opcode":"message_chat","msg_type":"channel","channel":"world","sender":"Alice","body":"hi"}
//! ```
//!
//! Authentication always succeeds with a single realm, and the session
//! delivers every captured event the moment its opcode is subscribed.
//! After that the session stays healthy until disconnected, which makes
//! it useful for dry runs of a full relay configuration.

use std::path::{Path, PathBuf};

use crate::{
    ChatEvent, ChatSender, GameClient, GameVersion, Opcode, ProtocolError,
    RealmInfo, RealmList, RealmLogin, SessionKey, WorldSession,
};

/// Replays chat events from a JSON-lines file.
#[derive(Debug, Clone)]
pub struct ReplayClient {
    path: PathBuf,
    realm: RealmInfo,
    characters: Vec<String>,
}

impl ReplayClient {
    /// Creates a client that advertises one realm named `realm_name` and
    /// an account holding `characters`.
    pub fn new(
        path: impl AsRef<Path>,
        realm_name: impl Into<String>,
        characters: Vec<String>,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            realm: RealmInfo {
                id: 1,
                name: realm_name.into(),
                host: "replay".into(),
                port: 0,
            },
            characters,
        }
    }
}

impl GameClient for ReplayClient {
    type Session = ReplaySession;

    async fn authenticate(
        &self,
        login: &RealmLogin,
    ) -> Result<RealmList, ProtocolError> {
        tracing::debug!(
            username = %login.username,
            version = %login.version,
            "replay: accepting realm login"
        );
        Ok(RealmList::new([self.realm.clone()], SessionKey(vec![0; 40])))
    }

    async fn open_world(
        &self,
        realm: &RealmInfo,
        account: &str,
        _key: &SessionKey,
        _version: GameVersion,
    ) -> Result<ReplaySession, ProtocolError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let events = parse_capture(&text)?;
        tracing::debug!(
            realm = %realm.name,
            account,
            path = %self.path.display(),
            events = events.len(),
            "replay: capture loaded"
        );
        Ok(ReplaySession {
            events,
            characters: self.characters.clone(),
            logged_in: false,
            closed: false,
        })
    }
}

/// World session backed by a loaded capture.
#[derive(Debug)]
pub struct ReplaySession {
    events: Vec<ChatEvent>,
    characters: Vec<String>,
    logged_in: bool,
    closed: bool,
}

impl WorldSession for ReplaySession {
    async fn wait_for_characters(
        &mut self,
    ) -> Result<Vec<String>, ProtocolError> {
        Ok(self.characters.clone())
    }

    async fn login(&mut self, character: &str) -> Result<(), ProtocolError> {
        if !self
            .characters
            .iter()
            .any(|c| c.eq_ignore_ascii_case(character))
        {
            return Err(ProtocolError::BadPlayer(character.to_string()));
        }
        self.logged_in = true;
        Ok(())
    }

    async fn wait_for_login_complete(&mut self) -> Result<(), ProtocolError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(ProtocolError::StreamBroken("login never sent".into()))
        }
    }

    async fn join_channel(
        &mut self,
        channel: &str,
    ) -> Result<(), ProtocolError> {
        tracing::debug!(channel, "replay: joined channel");
        Ok(())
    }

    fn subscribe(&mut self, opcode: Opcode, events: ChatSender) {
        for event in self.events.iter().filter(|e| e.opcode == opcode) {
            // Receiver gone means nobody is listening; stop early.
            if events.send(event.clone()).is_err() {
                break;
            }
        }
    }

    fn check_health(&mut self) -> Result<(), ProtocolError> {
        if self.closed {
            Err(ProtocolError::StreamBroken("replay session closed".into()))
        } else {
            Ok(())
        }
    }

    async fn disconnect(&mut self) {
        self.closed = true;
    }
}

/// Parses a JSON-lines capture.
fn parse_capture(text: &str) -> Result<Vec<ChatEvent>, ProtocolError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| {
                ProtocolError::Decode {
                    line: idx + 1,
                    source,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatMsgType;

    #[test]
    fn test_parse_capture_skips_comments_and_blanks() {
        let text = "# header\n\n{\"opcode\":\"message_chat\",\"msg_type\":\"channel\",\"channel\":\"world\",\"sender\":\"Alice\",\"body\":\"hi\"}\n";
        let events = parse_capture(text).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].msg_type, ChatMsgType::Channel);
        assert_eq!(events[0].sender, b"Alice");
    }

    #[test]
    fn test_parse_capture_reports_line_number() {
        let text = "# header\n{\"opcode\":\"message_chat\"}\n";
        let err = parse_capture(text).unwrap_err();
        assert!(matches!(err, ProtocolError::Decode { line: 2, .. }));
    }

    #[test]
    fn test_parse_capture_accepts_other_opcodes() {
        let text = r#"{"opcode":{"other":500},"msg_type":{"other":3},"sender":"x","body":"y"}"#;
        let events = parse_capture(text).unwrap();
        assert_eq!(events[0].opcode, Opcode::Other(500));
        assert_eq!(events[0].channel, "");
    }
}
