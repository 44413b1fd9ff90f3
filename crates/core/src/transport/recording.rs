/// Recording transport for tests
///
/// Keeps every outbound action in order and hands out sequential message
/// references. Individual operations can be made to fail.

use super::{Keyboard, SendOptions, Transport, TransportError, TransportResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use whisper_common::{AccountId, MessageRef};

/// One recorded outbound action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text {
        chat: AccountId,
        text: String,
        options: SendOptions,
        message: MessageRef,
    },
    Copy {
        chat: AccountId,
        from_chat: AccountId,
        source: MessageRef,
        options: SendOptions,
        message: MessageRef,
    },
    Reaction {
        chat: AccountId,
        message: MessageRef,
        emoji: String,
    },
    EditButtons {
        chat: AccountId,
        message: MessageRef,
        keyboard: Option<Keyboard>,
    },
    Delete {
        chat: AccountId,
        message: MessageRef,
    },
    Answer {
        callback_id: String,
        text: String,
        show_alert: bool,
    },
}

impl Outbound {
    pub fn operation(&self) -> &'static str {
        match self {
            Outbound::Text { .. } => "send_text",
            Outbound::Copy { .. } => "copy_message",
            Outbound::Reaction { .. } => "react_to",
            Outbound::EditButtons { .. } => "edit_buttons",
            Outbound::Delete { .. } => "delete_message",
            Outbound::Answer { .. } => "answer_callback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordingTransport {
    log: Arc<RwLock<Vec<Outbound>>>,
    next_message: Arc<AtomicI64>,
    failing: Arc<RwLock<HashSet<&'static str>>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            log: Arc::new(RwLock::new(Vec::new())),
            next_message: Arc::new(AtomicI64::new(1000)),
            failing: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make `operation` (e.g. `"react_to"`) fail until cleared
    pub async fn fail(&self, operation: &'static str) {
        self.failing.write().await.insert(operation);
    }

    pub async fn clear_failures(&self) {
        self.failing.write().await.clear();
    }

    pub async fn outbound(&self) -> Vec<Outbound> {
        self.log.read().await.clone()
    }

    /// Drain the log
    pub async fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.log.write().await)
    }

    /// Texts sent to `chat`, in order
    pub async fn texts_to(&self, chat: AccountId) -> Vec<String> {
        self.log
            .read()
            .await
            .iter()
            .filter_map(|o| match o {
                Outbound::Text { chat: c, text, .. } if *c == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, operation: &'static str, entry: Outbound) -> TransportResult<()> {
        if self.failing.read().await.contains(operation) {
            return Err(TransportError::Rejected {
                operation,
                reason: "injected failure".to_string(),
            });
        }
        self.log.write().await.push(entry);
        Ok(())
    }

    fn next_ref(&self) -> MessageRef {
        MessageRef::new(self.next_message.fetch_add(1, Ordering::SeqCst))
    }
}

impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat: AccountId,
        text: &str,
        options: SendOptions,
    ) -> TransportResult<MessageRef> {
        let message = self.next_ref();
        let entry = Outbound::Text {
            chat,
            text: text.to_string(),
            options,
            message,
        };
        self.record("send_text", entry).await?;
        Ok(message)
    }

    async fn copy_message(
        &self,
        chat: AccountId,
        from_chat: AccountId,
        source: MessageRef,
        options: SendOptions,
    ) -> TransportResult<MessageRef> {
        let message = self.next_ref();
        let entry = Outbound::Copy {
            chat,
            from_chat,
            source,
            options,
            message,
        };
        self.record("copy_message", entry).await?;
        Ok(message)
    }

    async fn react_to(&self, chat: AccountId, message: MessageRef, emoji: &str) -> TransportResult<()> {
        let entry = Outbound::Reaction {
            chat,
            message,
            emoji: emoji.to_string(),
        };
        self.record("react_to", entry).await
    }

    async fn edit_buttons(
        &self,
        chat: AccountId,
        message: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<()> {
        let entry = Outbound::EditButtons {
            chat,
            message,
            keyboard,
        };
        self.record("edit_buttons", entry).await
    }

    async fn delete_message(&self, chat: AccountId, message: MessageRef) -> TransportResult<()> {
        self.record("delete_message", Outbound::Delete { chat, message })
            .await
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        show_alert: bool,
    ) -> TransportResult<()> {
        let entry = Outbound::Answer {
            callback_id: callback_id.to_string(),
            text: text.to_string(),
            show_alert,
        };
        self.record("answer_callback", entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let transport = RecordingTransport::new();
        let first = transport
            .send_text(AccountId(1), "hi", SendOptions::new())
            .await
            .unwrap();
        transport.react_to(AccountId(1), first, "🕊").await.unwrap();
        let second = transport
            .copy_message(AccountId(2), AccountId(1), first, SendOptions::new())
            .await
            .unwrap();

        assert_ne!(first, second);
        let ops: Vec<_> = transport.outbound().await.iter().map(|o| o.operation()).collect();
        assert_eq!(ops, vec!["send_text", "react_to", "copy_message"]);
        assert_eq!(transport.texts_to(AccountId(1)).await, vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let transport = RecordingTransport::new();
        transport.fail("delete_message").await;

        let err = transport
            .delete_message(AccountId(1), MessageRef(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Rejected { operation: "delete_message", .. }));
        assert!(transport.outbound().await.is_empty());

        transport.clear_failures().await;
        transport.delete_message(AccountId(1), MessageRef(5)).await.unwrap();
        assert_eq!(transport.take().await.len(), 1);
        assert!(transport.outbound().await.is_empty());
    }
}
