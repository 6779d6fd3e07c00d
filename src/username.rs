use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::ValidationError;

pub const DEFAULT_MAX_LENGTH: usize = 30;

static USERNAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username pattern compiles"));

/// A username that passed validation. Only [`validate`] and
/// [`validate_with_max_length`] build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn validate(raw: &str) -> Result<Username, ValidationError> {
    validate_with_max_length(raw, DEFAULT_MAX_LENGTH)
}

/// Checks `raw` against the username rules, in order: blank input is
/// [`ValidationError::Empty`], anything outside `[A-Za-z0-9_-]{1,max_length}`
/// is [`ValidationError::Invalid`]. The raw value is kept untrimmed.
pub fn validate_with_max_length(raw: &str, max_length: usize) -> Result<Username, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    // The character class is ASCII-only, so byte length equals char count.
    if raw.len() > max_length || !USERNAME_CHARS.is_match(raw) {
        return Err(ValidationError::Invalid);
    }

    Ok(Username(raw.to_string()))
}
