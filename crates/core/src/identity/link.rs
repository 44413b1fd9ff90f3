/// Link token codec
///
/// A generic link names its owner by the `(LinkKey, CreatedAt)` pair rather
/// than the durable identity. The pair is packed with sqids over a secret
/// alphabet, so tokens round-trip exactly but cannot be forged without it.

use sqids::Sqids;
use std::fmt;
use thiserror::Error;
use whisper_common::{LinkKey, Timestamp, WhisperError};

/// Link codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid link alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Failed to encode link: {0}")]
    Encode(String),

    #[error("Link token decodes to {0} numbers, expected 2")]
    WrongArity(usize),

    #[error("Link value out of range")]
    OutOfRange,

    #[error("Link token is not in canonical form")]
    NonCanonical,
}

impl From<LinkError> for WhisperError {
    fn from(err: LinkError) -> Self {
        WhisperError::decode(err.to_string())
    }
}

/// Encodes and decodes link tokens
#[derive(Clone)]
pub struct LinkCodec {
    sqids: Sqids,
}

impl LinkCodec {
    /// Build a codec over `alphabet`
    pub fn new(alphabet: &str) -> Result<Self, LinkError> {
        let sqids = Sqids::builder()
            .alphabet(alphabet.chars().collect())
            .build()
            .map_err(|e| LinkError::InvalidAlphabet(e.to_string()))?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, link_key: LinkKey, created_at: Timestamp) -> Result<String, LinkError> {
        let created_at = u64::try_from(created_at.as_secs()).map_err(|_| LinkError::OutOfRange)?;

        self.sqids
            .encode(&[u64::from(link_key.get()), created_at])
            .map_err(|e| LinkError::Encode(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<(LinkKey, Timestamp), LinkError> {
        let numbers = self.sqids.decode(token);
        if numbers.len() != 2 {
            return Err(LinkError::WrongArity(numbers.len()));
        }

        let link_key = u32::try_from(numbers[0]).map_err(|_| LinkError::OutOfRange)?;
        let created_at = i64::try_from(numbers[1]).map_err(|_| LinkError::OutOfRange)?;

        // Several strings can decode to the same pair; only the one the
        // encoder produces is accepted.
        let canonical = self
            .sqids
            .encode(&numbers)
            .map_err(|e| LinkError::Encode(e.to_string()))?;
        if canonical != token {
            return Err(LinkError::NonCanonical);
        }

        Ok((LinkKey::new(link_key), Timestamp::from_secs(created_at)))
    }
}

impl fmt::Debug for LinkCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "k3G7QAe51FCsPW92uEOyq4Bg6Sp8YzVTmnU0liwDdHXLajZrfxNhobJIRcMvKt";

    #[test]
    fn test_round_trip() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        for (key, secs) in [
            (LinkKey::MIN, 0),
            (LinkKey::MAX, 1_700_000_000),
            (424_242, 1_234_567_890),
            (100_001, i64::from(u32::MAX)),
        ] {
            let token = codec.encode(LinkKey(key), Timestamp(secs)).unwrap();
            assert_eq!(codec.decode(&token).unwrap(), (LinkKey(key), Timestamp(secs)));
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        let a = codec.encode(LinkKey(123_456), Timestamp(1_700_000_000)).unwrap();
        let b = codec.encode(LinkKey(123_456), Timestamp(1_700_000_000)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_alphabet_changes_tokens() {
        let first = LinkCodec::new(ALPHABET).unwrap();
        let second = LinkCodec::new("abcdefghijklmnopqrstuvwxyz0123456789").unwrap();

        let token = first.encode(LinkKey(555_555), Timestamp(1_700_000_000)).unwrap();
        let other = second.encode(LinkKey(555_555), Timestamp(1_700_000_000)).unwrap();
        assert_ne!(token, other);
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        let single = codec.sqids.encode(&[7]).unwrap();
        assert_eq!(codec.decode(&single), Err(LinkError::WrongArity(1)));

        let triple = codec.sqids.encode(&[1, 2, 3]).unwrap();
        assert_eq!(codec.decode(&triple), Err(LinkError::WrongArity(3)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        assert!(codec.decode("").is_err());
        assert!(codec.decode("!!not-a-token!!").is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_key() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        let token = codec.sqids.encode(&[u64::from(u32::MAX) + 1, 5]).unwrap();
        assert_eq!(codec.decode(&token), Err(LinkError::OutOfRange));
    }

    #[test]
    fn test_negative_timestamp_is_rejected() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        assert_eq!(
            codec.encode(LinkKey(123_456), Timestamp(-1)),
            Err(LinkError::OutOfRange)
        );
    }

    #[test]
    fn test_bad_alphabet() {
        assert!(matches!(LinkCodec::new("ab"), Err(LinkError::InvalidAlphabet(_))));
    }

    #[test]
    fn test_debug_hides_alphabet() {
        let codec = LinkCodec::new(ALPHABET).unwrap();
        assert!(!format!("{:?}", codec).contains(ALPHABET));
    }
}
