/// Transport that logs outbound actions instead of calling a platform

use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;
use whisper_common::{AccountId, MessageRef};
use whisper_core::{Keyboard, SendOptions, Transport, TransportError};

type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Debug)]
pub struct LogTransport {
    next_message: AtomicI64,
}

impl Default for LogTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTransport {
    pub fn new() -> Self {
        Self {
            next_message: AtomicI64::new(1),
        }
    }

    fn next_ref(&self) -> MessageRef {
        MessageRef::new(self.next_message.fetch_add(1, Ordering::SeqCst))
    }
}

fn button_count(keyboard: &Option<Keyboard>) -> usize {
    keyboard
        .as_ref()
        .map(|rows| rows.iter().map(Vec::len).sum())
        .unwrap_or(0)
}

impl Transport for LogTransport {
    async fn send_text(
        &self,
        chat: AccountId,
        text: &str,
        options: SendOptions,
    ) -> TransportResult<MessageRef> {
        let message = self.next_ref();
        info!(
            "send_text chat={} message={} reply_to={:?} buttons={}: {}",
            chat,
            message,
            options.reply_to,
            button_count(&options.keyboard),
            text
        );
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
        info!(
            "copy_message chat={} from={} source={} message={} reply_to={:?}",
            chat, from_chat, source, message, options.reply_to
        );
        Ok(message)
    }

    async fn react_to(&self, chat: AccountId, message: MessageRef, emoji: &str) -> TransportResult<()> {
        info!("react_to chat={} message={} {}", chat, message, emoji);
        Ok(())
    }

    async fn edit_buttons(
        &self,
        chat: AccountId,
        message: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> TransportResult<()> {
        info!(
            "edit_buttons chat={} message={} buttons={}",
            chat,
            message,
            button_count(&keyboard)
        );
        Ok(())
    }

    async fn delete_message(&self, chat: AccountId, message: MessageRef) -> TransportResult<()> {
        info!("delete_message chat={} message={}", chat, message);
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        show_alert: bool,
    ) -> TransportResult<()> {
        info!(
            "answer_callback id={} alert={}: {}",
            callback_id, show_alert, text
        );
        Ok(())
    }
}
