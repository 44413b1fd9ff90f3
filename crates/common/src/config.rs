use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::types::{AccountId, Locale};

/// Relay protocol constants
pub mod protocol {
    /// Inline button payload cap imposed by the platform
    pub const MAX_CALLBACK_LEN: usize = 64;

    /// Marks a `/start` argument as a username instead of a link token
    pub const USERNAME_MARKER: char = '_';

    pub const MIN_USERNAME_LEN: usize = 3;

    pub const MAX_USERNAME_LEN: usize = 20;

    /// Default namespace prefix for invitation codes
    pub const INVITATION_CODE_PREFIX: &str = "whisper-";

    /// Smallest alphabet the link codec accepts
    pub const MIN_ALPHABET_LEN: usize = 3;
}

/// An identity seeded with an invitation quota at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Founder {
    pub account_id: AccountId,
    pub quota: u32,
}

/// Relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Secret alphabet for link tokens
    pub link_alphabet: String,

    /// Platform username of the bot, used in shareable links
    pub bot_username: String,

    /// Listen address of the webhook daemon
    pub listen_addr: String,

    /// Locale used when neither preference nor client language applies
    pub default_locale: Locale,

    /// Namespace prefix prepended to generated invitation codes
    pub invitation_code_prefix: String,

    /// Whether link issuance requires a redeemed invitation
    pub gated: bool,

    /// Identities seeded with an invitation quota
    pub founders: Vec<Founder>,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            link_alphabet: String::new(),
            bot_username: "whisper_bot".to_string(),
            listen_addr: "127.0.0.1:8080".to_string(),
            default_locale: Locale::EnUs,
            invitation_code_prefix: protocol::INVITATION_CODE_PREFIX.to_string(),
            gated: true,
            founders: Vec::new(),
            verbose: false,
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_link_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.link_alphabet = alphabet.into();
        self
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = username.into();
        self
    }

    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }

    pub fn with_gated(mut self, gated: bool) -> Self {
        self.gated = gated;
        self
    }

    pub fn with_founders(mut self, founders: Vec<Founder>) -> Self {
        self.founders = founders;
        self
    }

    /// Override secrets from `WHISPER_LINK_ALPHABET` and `WHISPER_BOT_USERNAME`
    pub fn apply_env(mut self) -> Self {
        if let Ok(alphabet) = std::env::var("WHISPER_LINK_ALPHABET") {
            if !alphabet.is_empty() {
                self.link_alphabet = alphabet;
            }
        }
        if let Ok(username) = std::env::var("WHISPER_BOT_USERNAME") {
            if !username.is_empty() {
                self.bot_username = username;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unique: HashSet<char> = self.link_alphabet.chars().collect();
        if unique.len() < protocol::MIN_ALPHABET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "link_alphabet needs at least {} unique characters",
                protocol::MIN_ALPHABET_LEN
            )));
        }
        if unique.len() != self.link_alphabet.chars().count() {
            return Err(ConfigError::InvalidValue(
                "link_alphabet contains repeated characters".to_string(),
            ));
        }
        if self.bot_username.is_empty() {
            return Err(ConfigError::InvalidValue("bot_username is empty".to_string()));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.invitation_code_prefix, "whisper-");
        assert!(config.gated);
        assert_eq!(config.default_locale, Locale::EnUs);
    }

    #[test]
    fn test_config_builder() {
        let config = RelayConfig::new()
            .with_link_alphabet("k3G7QAe51FCsPW92uEOyq4Bg6Sp8YzVTmnU0liwDdHXLajZrfxNhobJIRcMvKt")
            .with_bot_username("hush_bot")
            .with_gated(false)
            .with_founders(vec![Founder {
                account_id: AccountId(7),
                quota: 10,
            }]);

        assert!(config.validate().is_ok());
        assert_eq!(config.bot_username, "hush_bot");
        assert!(!config.gated);
        assert_eq!(config.founders.len(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_alphabet() {
        let empty = RelayConfig::new();
        assert!(matches!(empty.validate(), Err(ConfigError::InvalidValue(_))));

        let repeated = RelayConfig::new().with_link_alphabet("aabc");
        assert!(matches!(repeated.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            link_alphabet = "abcdef"
            default_locale = "fa_IR"

            [[founders]]
            account_id = 42
            quota = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.default_locale, Locale::FaIr);
        assert_eq!(config.founders[0].account_id, AccountId(42));
        assert_eq!(config.bot_username, "whisper_bot");
    }
}
