//! Client bundle assembly.
//!
//! A bundle is one flat `.ovpn` file: the client template followed by the
//! CA certificate, the client certificate, the client key, and (when the
//! server uses one) the control-channel shared secret, all inlined. This
//! is the accepted distribution format for OpenVPN clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info};

use crate::error::PkiError;
use crate::paths::PkiPaths;

/// Marker preceding the PEM payload in easy-rsa issued-certificate files.
/// Everything before it is a human-readable dump and is stripped.
const CERT_PREAMBLE_MARKER: &str = "Certificate:";

/// Assembles client configuration bundles.
#[derive(Debug, Clone)]
pub struct ConfigAssembler {
    paths: Arc<PkiPaths>,
}

impl ConfigAssembler {
    pub fn new(paths: Arc<PkiPaths>) -> Self {
        Self { paths }
    }

    /// Build the bundle for `name`, write it to the client's bundle path,
    /// and return the composed text.
    ///
    /// Every required input is a discrete read; a missing file surfaces as
    /// `MissingMaterial` carrying the offending path.
    pub async fn assemble(&self, name: &str) -> Result<String, PkiError> {
        let bundle_path = self.paths.bundle(name);
        debug!(client = name, bundle = %bundle_path.display(), "Assembling client bundle");

        // Template copy establishes the base file
        copy_material(&self.paths.client_template, &bundle_path).await?;

        let ca = read_material(&self.paths.ca_cert()).await?;
        let cert = read_material(&self.paths.issued_cert(name)).await?;
        let key = read_material(&self.paths.private_key(name)).await?;

        let cert_stripped = cert
            .split_once(CERT_PREAMBLE_MARKER)
            .map(|(_, rest)| rest)
            .unwrap_or(cert.as_str());

        let mut config = read_material(&bundle_path).await?;
        config.push_str("\n<ca>\n");
        config.push_str(&ca);
        config.push_str("</ca>\n");
        config.push_str("<cert>\n");
        config.push_str(cert_stripped);
        config.push_str("</cert>\n");
        config.push_str("<key>\n");
        config.push_str(&key);
        config.push_str("</key>\n");

        // The server conf decides which control-channel hardening mode the
        // client must carry; tls-crypt wins when both markers appear
        let server_conf = read_material(&self.paths.server_conf).await?;
        if server_conf.contains("tls-crypt") {
            let secret = read_material(&self.paths.tls_crypt_key()).await?;
            config.push_str("<tls-crypt>\n");
            config.push_str(&secret);
            config.push_str("</tls-crypt>\n");
        } else if server_conf.contains("tls-auth") {
            let secret = read_material(&self.paths.tls_auth_key()).await?;
            config.push_str("key-direction 1\n<tls-auth>\n");
            config.push_str(&secret);
            config.push_str("</tls-auth>\n");
        }

        fs::write(&bundle_path, &config)
            .await
            .map_err(PkiError::Filesystem)?;

        info!(client = name, bytes = config.len(), "Client bundle written");
        Ok(config)
    }
}

async fn read_material(path: &Path) -> Result<String, PkiError> {
    fs::read_to_string(path).await.map_err(|e| missing_or_fs(e, path))
}

async fn copy_material(from: &Path, to: &Path) -> Result<(), PkiError> {
    fs::copy(from, to)
        .await
        .map(|_| ())
        .map_err(|e| missing_or_fs(e, from))
}

fn missing_or_fs(err: std::io::Error, path: &Path) -> PkiError {
    if err.kind() == std::io::ErrorKind::NotFound {
        PkiError::MissingMaterial(PathBuf::from(path))
    } else {
        PkiError::Filesystem(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        paths: Arc<PkiPaths>,
    }

    fn fixture(server_conf: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = PkiPaths::under_root(dir.path());

        std::fs::create_dir_all(paths.pki_dir().join("issued")).unwrap();
        std::fs::create_dir_all(paths.pki_dir().join("private")).unwrap();
        std::fs::create_dir_all(&paths.openvpn_dir).unwrap();
        std::fs::create_dir_all(&paths.client_config_dir).unwrap();

        std::fs::write(&paths.client_template, "client\ndev tun\n").unwrap();
        std::fs::write(paths.ca_cert(), "CA-PEM\n").unwrap();
        std::fs::write(
            paths.issued_cert("alice"),
            "Certificate:\n    Data: preamble\nCERT-PEM\n",
        )
        .unwrap();
        std::fs::write(paths.private_key("alice"), "KEY-PEM\n").unwrap();
        std::fs::write(&paths.server_conf, server_conf).unwrap();
        std::fs::write(paths.tls_crypt_key(), "CRYPT-SECRET\n").unwrap();
        std::fs::write(paths.tls_auth_key(), "AUTH-SECRET\n").unwrap();

        Fixture {
            _dir: dir,
            paths: Arc::new(paths),
        }
    }

    #[tokio::test]
    async fn test_blocks_in_order_with_preamble_stripped() {
        let fx = fixture("port 1194\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();

        assert!(config.starts_with("client\ndev tun\n"));
        let ca = config.find("<ca>").unwrap();
        let cert = config.find("<cert>").unwrap();
        let key = config.find("<key>").unwrap();
        assert!(ca < cert && cert < key);
        assert!(config.contains("CERT-PEM"));
        assert!(!config.contains("Certificate:"));
        assert!(config.contains("Data: preamble"));
    }

    #[tokio::test]
    async fn test_tls_crypt_branch() {
        let fx = fixture("port 1194\ntls-crypt ta.key\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();
        assert!(config.contains("<tls-crypt>\nCRYPT-SECRET\n</tls-crypt>"));
        assert!(!config.contains("<tls-auth>"));
        assert!(!config.contains("key-direction"));
    }

    #[tokio::test]
    async fn test_tls_auth_branch_carries_key_direction() {
        let fx = fixture("port 1194\ntls-auth ta.key 0\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();
        assert!(config.contains("key-direction 1\n<tls-auth>\nAUTH-SECRET\n</tls-auth>"));
        assert!(!config.contains("<tls-crypt>"));
    }

    #[tokio::test]
    async fn test_tls_crypt_wins_when_both_markers_present() {
        let fx = fixture("tls-crypt ta.key\ntls-auth ta.key 0\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();
        assert!(config.contains("<tls-crypt>"));
        assert!(!config.contains("<tls-auth>"));
    }

    #[tokio::test]
    async fn test_neither_marker_means_no_secret_block() {
        let fx = fixture("port 1194\nproto udp\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();
        assert!(!config.contains("<tls-crypt>"));
        assert!(!config.contains("<tls-auth>"));
    }

    #[tokio::test]
    async fn test_missing_key_surfaces_path() {
        let fx = fixture("port 1194\n");
        std::fs::remove_file(fx.paths.private_key("alice")).unwrap();
        let err = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap_err();
        match err {
            PkiError::MissingMaterial(path) => {
                assert_eq!(path, fx.paths.private_key("alice"));
            }
            other => panic!("expected MissingMaterial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bundle_file_matches_returned_text() {
        let fx = fixture("tls-crypt ta.key\n");
        let config = ConfigAssembler::new(fx.paths.clone())
            .assemble("alice")
            .await
            .unwrap();
        let on_disk = std::fs::read_to_string(fx.paths.bundle("alice")).unwrap();
        assert_eq!(config, on_disk);
    }
}
