//! Client registry façade.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use vpnadmin_core::{ClientIdentity, ClientName};

use crate::bundle::ConfigAssembler;
use crate::error::PkiError;
use crate::index::IndexStore;
use crate::paths::PkiPaths;
use crate::revoke::RevocationCoordinator;
use crate::runner::CommandRunner;

/// The four public operations over VPN client identities: list, create,
/// revoke, fetch bundle.
///
/// Mutating operations for the same client name serialize on a per-name
/// async mutex; the toolchain's check-then-issue window is otherwise wide
/// enough for two concurrent `create` calls to both pass the existence
/// check. Distinct names proceed concurrently.
pub struct ClientRegistry {
    paths: Arc<PkiPaths>,
    runner: CommandRunner,
    index: IndexStore,
    assembler: ConfigAssembler,
    revoker: RevocationCoordinator,
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ClientRegistry {
    pub fn new(paths: PkiPaths) -> Self {
        Self::with_runner(paths, CommandRunner::new())
    }

    /// Build a registry with a custom-configured runner (timeouts).
    pub fn with_runner(paths: PkiPaths, runner: CommandRunner) -> Self {
        let paths = Arc::new(paths);
        Self {
            index: IndexStore::new(paths.index_file.clone()),
            assembler: ConfigAssembler::new(paths.clone()),
            revoker: RevocationCoordinator::new(paths.clone(), runner.clone()),
            paths,
            runner,
            name_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Names of all currently valid clients.
    pub async fn list(&self) -> Result<Vec<String>, PkiError> {
        self.index.list_valid_names().await
    }

    /// All identities in the ledger with their status, revoked and
    /// expired included.
    pub async fn identities(&self) -> Result<Vec<ClientIdentity>, PkiError> {
        self.index.identities().await
    }

    /// Issue a certificate for `name` and return the assembled bundle
    /// text.
    ///
    /// `encrypt_key` passphrase-protects the client's private key (the
    /// toolchain prompts on its own terminal; batch mode handles it).
    pub async fn create(&self, name: &str, encrypt_key: bool) -> Result<String, PkiError> {
        let name = ClientName::new(name)?;
        let lock = self.name_lock(name.as_str()).await;
        let _guard = lock.lock().await;

        if self.index.exists(name.as_str()).await? {
            debug!(client = %name, "Create rejected: client already exists");
            return Err(PkiError::AlreadyExists(name.into_inner()));
        }

        let mut args = vec!["--batch", "build-client-full", name.as_str()];
        if !encrypt_key {
            args.push("nopass");
        }
        self.runner
            .run("./easyrsa", &args, &self.paths.easy_rsa_dir, &[])
            .await?;
        info!(client = %name, encrypted_key = encrypt_key, "Client certificate issued");

        self.assembler.assemble(name.as_str()).await
    }

    /// Revoke `name` and clean up its derived artifacts.
    pub async fn revoke(&self, name: &str) -> Result<(), PkiError> {
        let name = ClientName::new(name)?;
        let lock = self.name_lock(name.as_str()).await;
        let _guard = lock.lock().await;

        if !self.index.exists(name.as_str()).await? {
            debug!(client = %name, "Revoke rejected: client not found");
            return Err(PkiError::NotFound(name.into_inner()));
        }

        self.revoker.revoke(name.as_str()).await
    }

    /// Return the client's bundle text, materializing it lazily.
    ///
    /// An existing bundle file is returned verbatim; otherwise the bundle
    /// is assembled fresh from the certificate material.
    pub async fn fetch_config(&self, name: &str) -> Result<String, PkiError> {
        let name = ClientName::new(name)?;

        if !self.index.exists(name.as_str()).await? {
            return Err(PkiError::NotFound(name.into_inner()));
        }

        match tokio::fs::read_to_string(self.paths.bundle(name.as_str())).await {
            Ok(config) => Ok(config),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(client = %name, "No bundle on disk, assembling");
                self.assembler.assemble(name.as_str()).await
            }
            Err(e) => Err(PkiError::Filesystem(e)),
        }
    }

    /// One mutex per client name; entries are created on first use and
    /// kept for the life of the registry.
    async fn name_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.name_locks.lock().await;
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_invalid_name_before_any_io() {
        // Paths point nowhere; an invalid name must fail before they are
        // ever touched
        let registry = ClientRegistry::new(PkiPaths::under_root(std::path::Path::new(
            "/nonexistent/vpnadmin",
        )));
        for bad in ["", "../alice", "a b", "x/y"] {
            let err = registry.create(bad, false).await.unwrap_err();
            assert!(matches!(err, PkiError::InvalidName(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn test_fetch_config_rejects_invalid_name() {
        let registry = ClientRegistry::new(PkiPaths::under_root(std::path::Path::new(
            "/nonexistent/vpnadmin",
        )));
        let err = registry.fetch_config("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, PkiError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_name_lock_is_shared_per_name() {
        let registry = ClientRegistry::new(PkiPaths::under_root(std::path::Path::new("/tmp")));
        let a1 = registry.name_lock("alice").await;
        let a2 = registry.name_lock("alice").await;
        let b = registry.name_lock("bob").await;
        assert!(Arc::ptr_eq(&a1, &a2));
        assert!(!Arc::ptr_eq(&a1, &b));
    }
}
