//! Destination URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// The destination a short link redirects to.
///
/// Must be an absolute `http` or `https` URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LongUrl(String);

impl LongUrl {
    /// Create a new destination URL, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or not an absolute web URL.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidInputError::LongUrl {
                value: s.clone(),
                reason: "please enter a URL".to_string(),
            }
            .into());
        }

        let url = Url::parse(trimmed).map_err(|e| InvalidInputError::LongUrl {
            value: s.clone(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(InvalidInputError::LongUrl {
                value: s.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }
            .into());
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the URL as entered (trimmed).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LongUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LongUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LongUrl {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LongUrl> for String {
    fn from(url: LongUrl) -> Self {
        url.0
    }
}
