//! Error types for PKI orchestration.

use std::path::PathBuf;

use thiserror::Error;
use vpnadmin_core::CoreError;

/// Errors that can occur while managing client certificates.
#[derive(Debug, Error)]
pub enum PkiError {
    /// Client name failed validation.
    #[error("Invalid client name: '{0}'. Use only alphanumeric characters, underscores, and dashes.")]
    InvalidName(String),

    /// A valid certificate already exists for this name.
    #[error("Client already exists: {0}")]
    AlreadyExists(String),

    /// No valid certificate exists for this name.
    #[error("Client not found: {0}")]
    NotFound(String),

    /// The index ledger could not be read or parsed.
    #[error("Failed to read index ledger: {0}")]
    LedgerUnreadable(String),

    /// A certificate, key, or template file required for bundle assembly
    /// is missing.
    #[error("Missing certificate material: {0}")]
    MissingMaterial(PathBuf),

    /// The toolchain reported failure; carries the combined output for
    /// logging.
    #[error("easy-rsa command failed: {0}")]
    ToolchainFailure(String),

    /// A filesystem operation outside bundle assembly failed.
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    /// The toolchain process could not be spawned at all.
    #[error("Failed to spawn easy-rsa process: {0}")]
    Spawn(std::io::Error),

    /// A toolchain invocation exceeded its time budget.
    #[error("easy-rsa command timed out after {0}s")]
    Timeout(u64),
}

impl From<CoreError> for PkiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidName(name) => Self::InvalidName(name),
            CoreError::MalformedRecord(detail) => Self::LedgerUnreadable(detail),
        }
    }
}
