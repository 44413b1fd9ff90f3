pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, Founder, RelayConfig};
pub use error::{Result, WhisperError};
pub use types::{AccountId, LinkKey, Locale, MessageRef, State, Timestamp};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const USER_ID_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid user id length: expected {expected}, got {actual}")]
    InvalidUserId { expected: usize, actual: usize },
    #[error("invalid user id hex: {0}")]
    InvalidUserIdHex(String),
    #[error("invitation quota exceeded: available {available}, required {required}")]
    QuotaExceeded { available: u32, required: u32 },
    #[error("invitation counter overflow")]
    QuotaOverflow,
    #[error("unsupported locale: {0}")]
    UnknownLocale(String),
}

/// Durable identity of a relay user.
///
/// Never shown to the other party of an exchange; it only travels inside
/// callback tokens that the platform keeps opaque to the clicking user.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UserId([u8; USER_ID_LEN]);

impl UserId {
    pub fn from_bytes(bytes: [u8; USER_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, DomainError> {
        let decoded =
            hex::decode(hex_str).map_err(|err| DomainError::InvalidUserIdHex(err.to_string()))?;
        let bytes: [u8; USER_ID_LEN] = decoded.as_slice().try_into().map_err(|_| {
            DomainError::InvalidUserId {
                expected: USER_ID_LEN,
                actual: decoded.len(),
            }
        })?;
        Ok(Self(bytes))
    }

    /// First 4 bytes as hex, for log lines.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({}...)", self.short_hex())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; USER_ID_LEN]> for UserId {
    fn from(value: [u8; USER_ID_LEN]) -> Self {
        Self::from_bytes(value)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_hex()
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Invitation counters of one identity: how many codes it may still back and
/// how many redemptions its codes have produced so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationQuota {
    left: u32,
    used: u32,
}

impl InvitationQuota {
    pub fn new(left: u32) -> Self {
        Self { left, used: 0 }
    }

    pub fn with_counts(left: u32, used: u32) -> Self {
        Self { left, used }
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn grant(&mut self, amount: u32) -> Result<(), DomainError> {
        self.left = self
            .left
            .checked_add(amount)
            .ok_or(DomainError::QuotaOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u32) -> Result<(), DomainError> {
        if self.left < amount {
            return Err(DomainError::QuotaExceeded {
                available: self.left,
                required: amount,
            });
        }
        self.left -= amount;
        Ok(())
    }

    pub fn record_use(&mut self) -> Result<(), DomainError> {
        self.used = self
            .used
            .checked_add(1)
            .ok_or(DomainError::QuotaOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_hex_roundtrip() {
        let hex_id = "ab".repeat(USER_ID_LEN);
        let parsed = UserId::from_hex(&hex_id).expect("should parse valid hex");
        assert_eq!(parsed.to_string(), hex_id);
        assert_eq!(parsed.to_string().len(), 32);
    }

    #[test]
    fn user_id_rejects_wrong_length() {
        let err = UserId::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidUserId {
                expected: USER_ID_LEN,
                actual: 2
            }
        );

        let parsed: UserId = "0a".repeat(USER_ID_LEN).parse().unwrap();
        assert_eq!(parsed, UserId::from_bytes([10u8; USER_ID_LEN]));
        assert_eq!(parsed.short_hex(), "0a0a0a0a");
    }

    #[test]
    fn user_id_rejects_bad_hex() {
        let err = UserId::from_hex("not-hex").unwrap_err();
        assert!(matches!(err, DomainError::InvalidUserIdHex(_)));
    }

    #[test]
    fn user_id_serializes_as_hex_string() {
        let id = UserId::from([7u8; USER_ID_LEN]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(USER_ID_LEN)));

        let encoded = bincode::serialize(&id).unwrap();
        let decoded: UserId = bincode::deserialize(&encoded).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn quota_debit_and_use() {
        let mut quota = InvitationQuota::new(5);
        quota.debit(3).unwrap();
        assert_eq!(quota.left(), 2);

        let err = quota.debit(3).unwrap_err();
        assert_eq!(
            err,
            DomainError::QuotaExceeded {
                available: 2,
                required: 3
            }
        );
        assert_eq!(quota.left(), 2);

        quota.record_use().unwrap();
        assert_eq!(quota.used(), 1);
    }

    #[test]
    fn quota_grant_overflow() {
        let mut quota = InvitationQuota::new(u32::MAX);
        assert_eq!(quota.grant(1).unwrap_err(), DomainError::QuotaOverflow);
    }
}
