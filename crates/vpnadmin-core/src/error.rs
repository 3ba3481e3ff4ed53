//! Core domain errors.

use thiserror::Error;

/// Core domain errors for vpnadmin.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Client name contains characters outside `[A-Za-z0-9_-]` or is empty.
    #[error("Invalid client name: '{0}'. Use only alphanumeric characters, underscores, and dashes.")]
    InvalidName(String),

    /// An index ledger line did not match the expected record layout.
    #[error("Malformed index record: {0}")]
    MalformedRecord(String),
}
