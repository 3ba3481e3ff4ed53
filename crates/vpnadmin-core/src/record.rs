//! Parsed index ledger records.
//!
//! The easy-rsa index file is newline-delimited, one record per issued
//! certificate, tab-separated:
//!
//! ```text
//! V	330101000000Z		A1B2C3	unknown	/CN=alice
//! R	330101000000Z	240101000000Z	D4E5F6	unknown	/CN=bob
//! ```
//!
//! Fields: status flag, expiry timestamp, revocation timestamp (empty
//! unless revoked), serial, filename, subject DN.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::ClientStatus;

/// One parsed line of the index ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Certificate lifecycle status from the leading flag.
    pub status: ClientStatus,

    /// Expiry timestamp, verbatim from the ledger (ASN.1 time string).
    pub expires: String,

    /// Revocation timestamp, present only for revoked records.
    pub revoked_at: Option<String>,

    /// Certificate serial number.
    pub serial: String,

    /// Full subject distinguished name.
    pub subject: String,
}

impl IndexRecord {
    /// Parse one ledger line.
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, CoreError> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            return Err(CoreError::MalformedRecord(line.to_string()));
        }

        let flag = fields[0]
            .chars()
            .next()
            .ok_or_else(|| CoreError::MalformedRecord(line.to_string()))?;
        let status = ClientStatus::from_flag(flag)
            .ok_or_else(|| CoreError::MalformedRecord(line.to_string()))?;

        let revoked_at = match fields[2] {
            "" => None,
            ts => Some(ts.to_string()),
        };

        Ok(Some(Self {
            status,
            expires: fields[1].to_string(),
            revoked_at,
            serial: fields[3].to_string(),
            subject: fields[5].to_string(),
        }))
    }

    /// Extract the common name from the subject DN.
    ///
    /// The CN is the last `/`-delimited, `=`-delimited component of the
    /// subject string.
    pub fn common_name(&self) -> Option<&str> {
        let last = self.subject.rsplit('/').next()?;
        let (_, value) = last.split_once('=')?;
        Some(value)
    }
}
