use thiserror::Error;
use whisper_common::config::protocol::{MAX_USERNAME_LEN, MIN_USERNAME_LEN};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must be {min}-{max} characters, got {actual}")]
    Length { min: usize, max: usize, actual: usize },

    #[error("Username contains invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("Username must start with a letter")]
    MustStartWithLetter,
}

/// Validate a submitted username and return its stored (lowercase) form.
///
/// Usernames are 3-20 ASCII letters, digits or underscores and start with a
/// letter.
pub fn validate_username(input: &str) -> Result<String, UsernameError> {
    let len = input.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(UsernameError::Length {
            min: MIN_USERNAME_LEN,
            max: MAX_USERNAME_LEN,
            actual: len,
        });
    }

    if let Some(bad) = input
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(UsernameError::InvalidCharacter(bad));
    }

    if !input.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(UsernameError::MustStartWithLetter);
    }

    Ok(input.to_ascii_lowercase())
}
