/// Callback action codec
///
/// Inline buttons carry `<prefix>|<arg>|<arg>...` tokens. Each action has a
/// short prefix and a fixed argument shape; message references are decimal
/// with `0` meaning "none", identities are the full hex id.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use whisper_common::config::protocol::MAX_CALLBACK_LEN;
use whisper_common::{Locale, MessageRef, UserId, WhisperError};

const SEPARATOR: char = '|';

/// Callback codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Empty callback payload")]
    Empty,

    #[error("Unknown callback prefix: {0}")]
    UnknownPrefix(String),

    #[error("Callback {prefix} takes {min}-{max} arguments, got {actual}")]
    Arity {
        prefix: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Invalid callback argument {0:?}")]
    InvalidArgument(String),

    #[error("Callback token is {0} bytes, limit is {max}", max = MAX_CALLBACK_LEN)]
    TooLong(usize),
}

impl From<CallbackError> for WhisperError {
    fn from(err: CallbackError) -> Self {
        WhisperError::invalid_callback(err.to_string())
    }
}

/// A relay action carried on an inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Start replying to `peer`, threading under `message` in their chat.
    /// `delivery` is the "message sent" placeholder to retract afterwards.
    Reply {
        peer: UserId,
        message: Option<MessageRef>,
        delivery: Option<MessageRef>,
    },
    Block {
        peer: UserId,
        message: Option<MessageRef>,
    },
    Unblock {
        peer: UserId,
        message: Option<MessageRef>,
    },
    /// Reveal the message `sender` relayed as `message`
    Open {
        sender: UserId,
        message: MessageRef,
        placeholder: Option<MessageRef>,
    },
    SetUsername,
    RemoveUsername,
    CancelUsername,
    SetLanguage(Locale),
    CancelLanguage,
    GenerateInvitation,
    CancelInvitationCode,
}

impl CallbackAction {
    pub fn prefix(&self) -> &'static str {
        match self {
            CallbackAction::Reply { .. } => "r",
            CallbackAction::Block { .. } => "b",
            CallbackAction::Unblock { .. } => "ub",
            CallbackAction::Open { .. } => "o",
            CallbackAction::SetUsername => "u",
            CallbackAction::RemoveUsername => "ru",
            CallbackAction::CancelUsername => "cu",
            CallbackAction::SetLanguage(_) => "l",
            CallbackAction::CancelLanguage => "lc",
            CallbackAction::GenerateInvitation => "ig",
            CallbackAction::CancelInvitationCode => "irc",
        }
    }

    /// Encode into a button payload
    pub fn encode(&self) -> Result<String, CallbackError> {
        let mut token = self.prefix().to_string();
        let mut push = |arg: String| {
            token.push(SEPARATOR);
            token.push_str(&arg);
        };

        match *self {
            CallbackAction::Reply {
                peer,
                message,
                delivery,
            } => {
                push(peer.to_hex());
                push(MessageRef::wire(message).to_string());
                if let Some(delivery) = delivery {
                    push(delivery.to_string());
                }
            }
            CallbackAction::Block { peer, message } => {
                push(peer.to_hex());
                if let Some(message) = message {
                    push(message.to_string());
                }
            }
            CallbackAction::Unblock { peer, message } => {
                push(peer.to_hex());
                push(MessageRef::wire(message).to_string());
            }
            CallbackAction::Open {
                sender,
                message,
                placeholder,
            } => {
                push(sender.to_hex());
                push(message.to_string());
                if let Some(placeholder) = placeholder {
                    push(placeholder.to_string());
                }
            }
            CallbackAction::SetLanguage(locale) => push(locale.code().to_string()),
            CallbackAction::SetUsername
            | CallbackAction::RemoveUsername
            | CallbackAction::CancelUsername
            | CallbackAction::CancelLanguage
            | CallbackAction::GenerateInvitation
            | CallbackAction::CancelInvitationCode => {}
        }

        if token.len() > MAX_CALLBACK_LEN {
            return Err(CallbackError::TooLong(token.len()));
        }
        Ok(token)
    }

    /// Parse a button payload
    pub fn parse(token: &str) -> Result<Self, CallbackError> {
        if token.is_empty() {
            return Err(CallbackError::Empty);
        }
        if token.len() > MAX_CALLBACK_LEN {
            return Err(CallbackError::TooLong(token.len()));
        }

        let mut parts = token.split(SEPARATOR);
        let prefix = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let action = match prefix {
            "r" => {
                expect_arity("r", &args, 2, 3)?;
                CallbackAction::Reply {
                    peer: parse_user(args[0])?,
                    message: parse_optional_ref(args[1])?,
                    delivery: args.get(2).map(|a| parse_optional_ref(a)).transpose()?.flatten(),
                }
            }
            "b" => {
                expect_arity("b", &args, 1, 2)?;
                CallbackAction::Block {
                    peer: parse_user(args[0])?,
                    message: args.get(1).map(|a| parse_optional_ref(a)).transpose()?.flatten(),
                }
            }
            "ub" => {
                expect_arity("ub", &args, 2, 2)?;
                CallbackAction::Unblock {
                    peer: parse_user(args[0])?,
                    message: parse_optional_ref(args[1])?,
                }
            }
            "o" => {
                expect_arity("o", &args, 2, 3)?;
                let message = parse_optional_ref(args[1])?
                    .ok_or_else(|| CallbackError::InvalidArgument(args[1].to_string()))?;
                CallbackAction::Open {
                    sender: parse_user(args[0])?,
                    message,
                    placeholder: args.get(2).map(|a| parse_optional_ref(a)).transpose()?.flatten(),
                }
            }
            "l" => {
                expect_arity("l", &args, 1, 1)?;
                let locale = Locale::from_code(args[0])
                    .map_err(|_| CallbackError::InvalidArgument(args[0].to_string()))?;
                CallbackAction::SetLanguage(locale)
            }
            "u" => nullary("u", &args, CallbackAction::SetUsername)?,
            "ru" => nullary("ru", &args, CallbackAction::RemoveUsername)?,
            "cu" => nullary("cu", &args, CallbackAction::CancelUsername)?,
            "lc" => nullary("lc", &args, CallbackAction::CancelLanguage)?,
            "ig" => nullary("ig", &args, CallbackAction::GenerateInvitation)?,
            "irc" => nullary("irc", &args, CallbackAction::CancelInvitationCode)?,
            other => return Err(CallbackError::UnknownPrefix(other.to_string())),
        };

        Ok(action)
    }
}

impl FromStr for CallbackAction {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

fn expect_arity(
    prefix: &'static str,
    args: &[&str],
    min: usize,
    max: usize,
) -> Result<(), CallbackError> {
    if args.len() < min || args.len() > max {
        return Err(CallbackError::Arity {
            prefix,
            min,
            max,
            actual: args.len(),
        });
    }
    Ok(())
}

fn nullary(
    prefix: &'static str,
    args: &[&str],
    action: CallbackAction,
) -> Result<CallbackAction, CallbackError> {
    expect_arity(prefix, args, 0, 0)?;
    Ok(action)
}

fn parse_user(arg: &str) -> Result<UserId, CallbackError> {
    UserId::from_hex(arg).map_err(|_| CallbackError::InvalidArgument(arg.to_string()))
}

fn parse_optional_ref(arg: &str) -> Result<Option<MessageRef>, CallbackError> {
    arg.parse::<i64>()
        .map(MessageRef::non_zero)
        .map_err(|_| CallbackError::InvalidArgument(arg.to_string()))
}
