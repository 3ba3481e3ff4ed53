//! Validated client name newtype.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A validated VPN client name.
///
/// Construction only succeeds for non-empty strings matching
/// `[A-Za-z0-9_-]+`. The restriction is what keeps a client name from
/// escaping the certificate store: no path separators, no dots, no
/// whitespace can reach a filesystem path or a toolchain argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientName(String);

impl ClientName {
    /// Create a validated ClientName from a string.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(CoreError::InvalidName(name))
        }
    }

    /// Whether a raw string is an acceptable client name.
    pub fn is_valid(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ClientName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ClientName::new(raw).map_err(serde::de::Error::custom)
    }
}
