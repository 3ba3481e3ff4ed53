//! Revocation sequencing.
//!
//! Revoking a client is a multi-step sequence against a toolchain with no
//! transactional guarantees. Every step is idempotent, so recovery from a
//! mid-sequence failure is a retry of the same `revoke` call; no rollback
//! is attempted.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::{info, warn};

use crate::error::PkiError;
use crate::paths::PkiPaths;
use crate::runner::CommandRunner;

/// CRL validity window passed to `gen-crl`, in days.
const CRL_DAYS: &str = "3650";

/// Published-CRL mode: the VPN daemon runs under a different principal
/// and needs read access.
const CRL_MODE: u32 = 0o644;

/// Drives the revoke -> CRL regeneration -> publication -> cleanup
/// sequence.
#[derive(Debug, Clone)]
pub struct RevocationCoordinator {
    paths: Arc<PkiPaths>,
    runner: CommandRunner,
}

impl RevocationCoordinator {
    pub fn new(paths: Arc<PkiPaths>, runner: CommandRunner) -> Self {
        Self { paths, runner }
    }

    /// Revoke `name`'s certificate and bring the derived artifacts
    /// (published CRL, bundle file, pool ledger) back in line.
    ///
    /// Aborts at the first failing step. A failure after the revoke
    /// subcommand leaves the ledger updated but the published CRL stale
    /// until the next successful revocation.
    pub async fn revoke(&self, name: &str) -> Result<(), PkiError> {
        self.runner
            .run(
                "./easyrsa",
                &["--batch", "revoke", name],
                &self.paths.easy_rsa_dir,
                &[],
            )
            .await?;
        info!(client = name, "Certificate revoked in index ledger");

        if let Err(e) = self.republish_and_cleanup(name).await {
            warn!(
                client = name,
                error = %e,
                "Revocation recorded but republish/cleanup incomplete; published CRL is stale until the next successful revoke"
            );
            return Err(e);
        }

        info!(client = name, "Revocation sequence completed");
        Ok(())
    }

    async fn republish_and_cleanup(&self, name: &str) -> Result<(), PkiError> {
        // Regenerate the CRL with a long validity window
        self.runner
            .run(
                "./easyrsa",
                &["gen-crl"],
                &self.paths.easy_rsa_dir,
                &[("EASYRSA_CRL_DAYS", CRL_DAYS)],
            )
            .await?;

        // Replace the published CRL
        let published = self.paths.published_crl();
        remove_if_exists(&published).await?;
        fs::copy(self.paths.generated_crl(), &published)
            .await
            .map_err(PkiError::Filesystem)?;
        fs::set_permissions(&published, std::fs::Permissions::from_mode(CRL_MODE))
            .await
            .map_err(PkiError::Filesystem)?;
        info!(crl = %published.display(), "CRL republished");

        // Cleanup: bundle file and pool-ledger row
        remove_if_exists(&self.paths.bundle(name)).await?;
        self.prune_pool_ledger(name).await?;
        Ok(())
    }

    /// Delete `name`'s row (any line with the `name,` prefix) from the
    /// dynamic address-pool ledger. A missing ledger is not an error.
    async fn prune_pool_ledger(&self, name: &str) -> Result<(), PkiError> {
        let ledger = self.paths.pool_ledger();
        let content = match fs::read_to_string(&ledger).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(PkiError::Filesystem(e)),
        };

        let prefix = format!("{name},");
        let mut kept: String = content
            .lines()
            .filter(|line| !line.starts_with(&prefix))
            .collect::<Vec<_>>()
            .join("\n");
        if !kept.is_empty() {
            kept.push('\n');
        }

        if kept != content {
            fs::write(&ledger, kept).await.map_err(PkiError::Filesystem)?;
            info!(client = name, ledger = %ledger.display(), "Pool ledger row removed");
        }
        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), PkiError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PkiError::Filesystem(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_if_exists_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.pem");
        remove_if_exists(&path).await.unwrap();

        std::fs::write(&path, "x").unwrap();
        remove_if_exists(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_prune_pool_ledger_removes_exact_prefix_only() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Arc::new(PkiPaths::under_root(dir.path()));
        std::fs::create_dir_all(&paths.openvpn_dir).unwrap();
        std::fs::write(
            paths.pool_ledger(),
            "alice,10.8.0.2\nalice-laptop,10.8.0.3\nbob,10.8.0.4\n",
        )
        .unwrap();

        let coordinator = RevocationCoordinator::new(paths.clone(), CommandRunner::new());
        coordinator.prune_pool_ledger("alice").await.unwrap();

        let remaining = std::fs::read_to_string(paths.pool_ledger()).unwrap();
        assert_eq!(remaining, "alice-laptop,10.8.0.3\nbob,10.8.0.4\n");
    }

    #[tokio::test]
    async fn test_prune_pool_ledger_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Arc::new(PkiPaths::under_root(dir.path()));
        let coordinator = RevocationCoordinator::new(paths, CommandRunner::new());
        coordinator.prune_pool_ledger("alice").await.unwrap();
    }
}
