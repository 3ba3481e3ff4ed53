//! vpnadmin PKI orchestration
//!
//! This crate drives the external easy-rsa toolchain to manage VPN client
//! certificate lifecycles: issuing, bundling into ready-to-use `.ovpn`
//! files, revoking, and keeping the derived artifacts (published CRL,
//! bundle files, address-pool ledger) consistent.
//!
//! The toolchain offers no transactional guarantees and no reliable
//! exit-code contract, so success is judged heuristically from command
//! output and multi-step sequences are built from idempotent steps that
//! are safe to retry.

pub mod bundle;
pub mod error;
pub mod index;
pub mod paths;
pub mod registry;
pub mod revoke;
pub mod runner;

// Re-export commonly used types
pub use bundle::ConfigAssembler;
pub use error::PkiError;
pub use index::IndexStore;
pub use paths::PkiPaths;
pub use registry::ClientRegistry;
pub use revoke::RevocationCoordinator;
pub use runner::{classify, CommandResult, CommandRunner, Verdict};
