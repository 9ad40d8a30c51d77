//! Chat event filtering and forwarding.

use std::sync::Arc;

use tcrelay_protocol::{ChatEvent, ChatMsgType};
use tcrelay_store::{KvStore, MessageId, MessageStore, StoreError};

use crate::sanitize;

/// Decides which chat events get relayed, and relays them.
///
/// An event is relayed only if all of these hold:
/// - the opcode is one of the two chat opcodes,
/// - the message type is channel chat,
/// - the channel is the configured one (case-insensitive),
/// - the sender is not our own character (case-insensitive).
///
/// Relayed events are stored as `"<sender>: <sanitized body>"`.
pub struct ChatHandler<K: KvStore> {
    channel: String,
    character: String,
    store: Arc<MessageStore<K>>,
}

impl<K: KvStore> ChatHandler<K> {
    pub fn new(
        channel: impl Into<String>,
        character: impl Into<String>,
        store: Arc<MessageStore<K>>,
    ) -> Self {
        Self {
            channel: channel.into(),
            character: character.into(),
            store,
        }
    }

    /// Returns `true` if `event` should be relayed.
    pub fn accepts(&self, event: &ChatEvent) -> bool {
        event.opcode.is_chat()
            && event.msg_type == ChatMsgType::Channel
            && event.channel.to_lowercase() == self.channel.to_lowercase()
            && event.sender_text().to_lowercase()
                != self.character.to_lowercase()
    }

    /// Formats the stored line for an accepted event.
    pub fn format(event: &ChatEvent) -> String {
        format!("{}: {}", event.sender_text(), sanitize(&event.body_text()))
    }

    /// Relays `event` if it passes the filter.
    ///
    /// Returns the id it was stored under, or `None` if it was filtered
    /// out.
    ///
    /// # Errors
    /// Store failures are passed through untouched.
    pub async fn handle(
        &self,
        event: &ChatEvent,
    ) -> Result<Option<MessageId>, StoreError> {
        if !self.accepts(event) {
            tracing::trace!(
                opcode = %event.opcode,
                channel = %event.channel,
                "chat event filtered out"
            );
            return Ok(None);
        }

        let line = Self::format(event);
        let id = self.store.save(&line).await?;
        tracing::debug!(%id, channel = %event.channel, "relayed chat message");
        Ok(Some(id))
    }

    /// The store messages are written to.
    pub fn store(&self) -> &Arc<MessageStore<K>> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tcrelay_protocol::Opcode;
    use tcrelay_store::{COUNTER_KEY, MemoryStore};

    use super::*;

    fn handler() -> ChatHandler<MemoryStore> {
        let store = Arc::new(MessageStore::new(
            MemoryStore::new(),
            Duration::from_secs(60),
        ));
        ChatHandler::new("World", "Relaybot", store)
    }

    async fn counter(handler: &ChatHandler<MemoryStore>) -> Option<String> {
        handler.store().kv().get(COUNTER_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn test_handle_matching_event_stores_one_line() {
        let handler = handler();
        let event = ChatEvent::channel_message("wOrLd", "Alice", "hello all");

        let id = handler.handle(&event).await.unwrap();

        assert_eq!(id, Some(MessageId::new(1)));
        assert_eq!(
            handler.store().kv().get("1").await.unwrap().as_deref(),
            Some("Alice: hello all")
        );
        assert_eq!(counter(&handler).await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_handle_sanitizes_body() {
        let handler = handler();
        let event = ChatEvent::channel_message(
            "world",
            "Alice",
            "wts |cffffffff|Hitem:1234:0:0:0|h[Sword of Testing]|h|r a||b",
        );

        handler.handle(&event).await.unwrap();

        assert_eq!(
            handler.store().kv().get("1").await.unwrap().as_deref(),
            Some("Alice: wts [Sword of Testing] a||b")
        );
    }

    #[tokio::test]
    async fn test_handle_gm_opcode_is_relayed() {
        let handler = handler();
        let mut event = ChatEvent::channel_message("world", "Gamemaster", "hi");
        event.opcode = Opcode::GmMessageChat;

        assert!(handler.handle(&event).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_handle_other_channel_writes_nothing() {
        let handler = handler();
        let event = ChatEvent::channel_message("Trade", "Alice", "wts");

        assert_eq!(handler.handle(&event).await.unwrap(), None);
        assert!(handler.store().kv().is_empty().await);
    }

    #[tokio::test]
    async fn test_handle_own_message_writes_nothing() {
        let handler = handler();
        let event = ChatEvent::channel_message("world", "RELAYBOT", "echo");

        assert_eq!(handler.handle(&event).await.unwrap(), None);
        assert_eq!(counter(&handler).await, None);
    }

    #[test]
    fn test_accepts_rejects_non_channel_type() {
        let handler = handler();
        let mut event = ChatEvent::channel_message("world", "Alice", "hi");
        event.msg_type = ChatMsgType::Say;
        assert!(!handler.accepts(&event));
    }

    #[test]
    fn test_accepts_rejects_non_chat_opcode() {
        let handler = handler();
        let mut event = ChatEvent::channel_message("world", "Alice", "hi");
        event.opcode = Opcode::Other(0x1F6);
        assert!(!handler.accepts(&event));
    }

    #[test]
    fn test_format_decodes_invalid_utf8_lossily() {
        let mut event = ChatEvent::channel_message("world", "Alice", "");
        event.body = vec![b'o', b'k', 0xC3];
        assert_eq!(
            ChatHandler::<MemoryStore>::format(&event),
            "Alice: ok\u{FFFD}"
        );
    }
}
