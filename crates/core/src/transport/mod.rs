/// Outbound transport
///
/// The relay talks to the chat platform only through [`Transport`]. Chats
/// are addressed by account id since every exchange happens in private
/// chats with the bot.

pub mod recording;

pub use recording::{Outbound, RecordingTransport};

use std::future::Future;
use thiserror::Error;
use whisper_common::{AccountId, MessageRef, WhisperError};

/// Transport errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Platform rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    #[error("Platform unreachable: {0}")]
    Unreachable(String),
}

impl From<TransportError> for WhisperError {
    fn from(err: TransportError) -> Self {
        WhisperError::collaborator(err.to_string())
    }
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    /// Encoded callback payload
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Rows of inline buttons
pub type Keyboard = Vec<Vec<Button>>;

/// Options of an outbound message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Message to thread under. Sent anyway if it no longer exists.
    pub reply_to: Option<MessageRef>,
    pub keyboard: Option<Keyboard>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply_to(mut self, message: Option<MessageRef>) -> Self {
        self.reply_to = message;
        self
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Chat platform operations used by the relay
pub trait Transport: Send + Sync {
    fn send_text(
        &self,
        chat: AccountId,
        text: &str,
        options: SendOptions,
    ) -> impl Future<Output = TransportResult<MessageRef>> + Send;

    /// Copy `message` from `from_chat` into `chat` without attribution
    fn copy_message(
        &self,
        chat: AccountId,
        from_chat: AccountId,
        message: MessageRef,
        options: SendOptions,
    ) -> impl Future<Output = TransportResult<MessageRef>> + Send;

    fn react_to(
        &self,
        chat: AccountId,
        message: MessageRef,
        emoji: &str,
    ) -> impl Future<Output = TransportResult<()>> + Send;

    /// Replace the inline keyboard of a message; `None` removes it
    fn edit_buttons(
        &self,
        chat: AccountId,
        message: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> impl Future<Output = TransportResult<()>> + Send;

    fn delete_message(
        &self,
        chat: AccountId,
        message: MessageRef,
    ) -> impl Future<Output = TransportResult<()>> + Send;

    fn answer_callback(
        &self,
        callback_id: &str,
        text: &str,
        show_alert: bool,
    ) -> impl Future<Output = TransportResult<()>> + Send;
}
