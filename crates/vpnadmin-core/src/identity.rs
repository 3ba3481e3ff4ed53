//! Client identity model derived from the index ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an issued client certificate.
///
/// Mirrors the single-character status flag leading each index ledger
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Certificate is issued and usable (`V`).
    Valid,
    /// Certificate has been revoked (`R`).
    Revoked,
    /// Certificate has expired (`E`).
    Expired,
}

impl ClientStatus {
    /// Parse the leading status flag of an index record.
    pub fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'V' => Some(Self::Valid),
            'R' => Some(Self::Revoked),
            'E' => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Valid => "valid",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// A VPN client identity as recorded in the index ledger.
///
/// Never persisted on its own; always re-derived from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Common name from the certificate subject.
    pub name: String,

    /// Current lifecycle status.
    pub status: ClientStatus,
}
