use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::DomainError;

/// Platform account id of a user. Private chats share the id, so it also
/// addresses outbound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl AccountId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to a message inside one chat's message stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRef(pub i64);

impl MessageRef {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Wire tokens use `0` for "no message"
    pub fn non_zero(id: i64) -> Option<Self> {
        (id != 0).then_some(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }

    /// Inverse of [`MessageRef::non_zero`]
    pub fn wire(value: Option<MessageRef>) -> i64 {
        value.map(|m| m.0).unwrap_or(0)
    }
}

impl std::fmt::Display for MessageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric half of the generic-link composite key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkKey(pub u32);

impl LinkKey {
    pub const MIN: u32 = 100_000;
    pub const MAX: u32 = 999_999;

    pub fn new(key: u32) -> Self {
        Self(key)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Timestamp in Unix epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        Self(secs)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }
}

/// Conversational state of a user. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    #[default]
    Idle,
    /// Waiting for the message to relay to the pending contact
    Sending,
    SettingUsername,
    GeneratingInvitation,
    AwaitingInvitationCode,
}

impl State {
    /// States that own relay context (contact and message references)
    pub fn holds_relay_context(&self) -> bool {
        matches!(self, State::Sending)
    }
}

/// Supported interface languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "fa_IR")]
    FaIr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::EnUs, Locale::FaIr];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::FaIr => "fa_IR",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == code)
            .ok_or_else(|| DomainError::UnknownLocale(code.to_string()))
    }

    /// Maps the two-letter language the platform reports for a client
    pub fn from_client_language(language: &str) -> Option<Self> {
        match language {
            "en" => Some(Locale::EnUs),
            "fa" => Some(Locale::FaIr),
            _ => None,
        }
    }

    /// Explicit preference, else the client's language, else `fallback`
    pub fn resolve(preference: Option<Locale>, client_language: Option<&str>, fallback: Locale) -> Self {
        preference
            .or_else(|| client_language.and_then(Self::from_client_language))
            .unwrap_or(fallback)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ref_wire_zero() {
        assert_eq!(MessageRef::non_zero(0), None);
        assert_eq!(MessageRef::non_zero(42), Some(MessageRef(42)));
        assert_eq!(MessageRef::wire(None), 0);
        assert_eq!(MessageRef::wire(Some(MessageRef(9))), 9);
    }

    #[test]
    fn test_locale_resolution_order() {
        assert_eq!(Locale::resolve(Some(Locale::FaIr), Some("en"), Locale::EnUs), Locale::FaIr);
        assert_eq!(Locale::resolve(None, Some("fa"), Locale::EnUs), Locale::FaIr);
        assert_eq!(Locale::resolve(None, Some("de"), Locale::EnUs), Locale::EnUs);
        assert_eq!(Locale::resolve(None, None, Locale::FaIr), Locale::FaIr);
    }

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("fa_IR").unwrap(), Locale::FaIr);
        assert!(Locale::from_code("de_DE").is_err());
        assert_eq!(serde_json::to_string(&Locale::EnUs).unwrap(), "\"en_US\"");
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&State::AwaitingInvitationCode).unwrap();
        assert_eq!(json, "\"AWAITING_INVITATION_CODE\"");
        assert!(State::Sending.holds_relay_context());
        assert!(!State::SettingUsername.holds_relay_context());
    }

    #[test]
    fn test_timestamp() {
        let ts = Timestamp::now();
        assert!(ts.as_secs() > 1_600_000_000);
    }
}
