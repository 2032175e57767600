//! Custom alias type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// Maximum alias length accepted by the client.
pub const MAX_ALIAS_LEN: usize = 64;

/// A validated custom alias for a short link.
///
/// Aliases become the path segment of the short link, so they are limited
/// to ASCII letters, digits, `-` and `_`.
///
/// # Example
///
/// ```
/// use shortlink::Alias;
///
/// let alias = Alias::new("launch-2024").unwrap();
/// assert_eq!(alias.as_str(), "launch-2024");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    /// Create a new alias from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid alias.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the alias string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Alias {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if s.len() > MAX_ALIAS_LEN {
            return Err(InvalidInputError::Alias {
                value: s.to_string(),
                reason: format!("exceeds maximum length of {} characters", MAX_ALIAS_LEN),
            }
            .into());
        }

        if let Some(c) = s
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(InvalidInputError::Alias {
                value: s.to_string(),
                reason: format!("contains invalid character '{}'", c),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Alias {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Alias {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Alias> for String {
    fn from(alias: Alias) -> Self {
        alias.0
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_alias() {
        let alias = Alias::new("my_link-1").unwrap();
        assert_eq!(alias.as_str(), "my_link-1");
    }

    #[test]
    fn invalid_empty() {
        assert!(Alias::new("").is_err());
    }

    #[test]
    fn invalid_character() {
        assert!(Alias::new("a/b").is_err());
        assert!(Alias::new("with space").is_err());
    }

    #[test]
    fn invalid_too_long() {
        assert!(Alias::new("a".repeat(MAX_ALIAS_LEN + 1)).is_err());
        assert!(Alias::new("a".repeat(MAX_ALIAS_LEN)).is_ok());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Alias, _> = serde_json::from_str("\"promo\"");
        assert!(ok.is_ok());
        let bad: Result<Alias, _> = serde_json::from_str("\"no way\"");
        assert!(bad.is_err());
    }
}
