//! vpnadmin Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Filesystem
//! - Runtime specifics
//!
//! All types here represent the core business domain of vpnadmin: VPN
//! client identities derived from the easy-rsa index ledger.

pub mod error;
pub mod identity;
pub mod name;
pub mod record;

// Re-export commonly used types
pub use error::CoreError;
pub use identity::{ClientIdentity, ClientStatus};
pub use name::ClientName;
pub use record::IndexRecord;
