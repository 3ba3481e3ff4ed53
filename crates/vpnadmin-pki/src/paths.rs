//! Filesystem layout of the easy-rsa working area and OpenVPN directory.

use std::path::{Path, PathBuf};

/// Every filesystem location the PKI core touches.
///
/// Base directories are configurable; per-client and per-artifact paths
/// are derived so path construction lives in one place.
#[derive(Debug, Clone)]
pub struct PkiPaths {
    /// easy-rsa installation directory (contains the `easyrsa` script and
    /// the `pki/` working area).
    pub easy_rsa_dir: PathBuf,

    /// OpenVPN server directory (published CRL, shared-secret keys, pool
    /// ledger).
    pub openvpn_dir: PathBuf,

    /// Directory where assembled client bundles are written.
    pub client_config_dir: PathBuf,

    /// The index ledger.
    pub index_file: PathBuf,

    /// Client configuration template prepended to every bundle.
    pub client_template: PathBuf,

    /// Server configuration, consulted for the tls-crypt/tls-auth marker.
    pub server_conf: PathBuf,
}

impl PkiPaths {
    /// Build paths from environment variables, falling back to the
    /// standard `/etc/openvpn` tree.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            easy_rsa_dir: env_path("EASY_RSA_DIR", defaults.easy_rsa_dir),
            openvpn_dir: env_path("OPENVPN_DIR", defaults.openvpn_dir),
            client_config_dir: env_path("CLIENT_CONFIG_DIR", defaults.client_config_dir),
            index_file: env_path("INDEX_FILE", defaults.index_file),
            client_template: env_path("CLIENT_TEMPLATE", defaults.client_template),
            server_conf: env_path("SERVER_CONF", defaults.server_conf),
        }
    }

    /// The `pki/` working area inside the easy-rsa directory.
    pub fn pki_dir(&self) -> PathBuf {
        self.easy_rsa_dir.join("pki")
    }

    /// CA root certificate.
    pub fn ca_cert(&self) -> PathBuf {
        self.pki_dir().join("ca.crt")
    }

    /// Issued certificate for a client.
    pub fn issued_cert(&self, name: &str) -> PathBuf {
        self.pki_dir().join("issued").join(format!("{name}.crt"))
    }

    /// Private key for a client.
    pub fn private_key(&self, name: &str) -> PathBuf {
        self.pki_dir().join("private").join(format!("{name}.key"))
    }

    /// Freshly generated CRL in the easy-rsa working area.
    pub fn generated_crl(&self) -> PathBuf {
        self.pki_dir().join("crl.pem")
    }

    /// Published CRL the VPN daemon reads.
    pub fn published_crl(&self) -> PathBuf {
        self.openvpn_dir.join("crl.pem")
    }

    /// Assembled bundle for a client.
    pub fn bundle(&self, name: &str) -> PathBuf {
        self.client_config_dir.join(format!("{name}.ovpn"))
    }

    /// tls-crypt shared secret.
    pub fn tls_crypt_key(&self) -> PathBuf {
        self.openvpn_dir.join("tls-crypt.key")
    }

    /// tls-auth shared secret.
    pub fn tls_auth_key(&self) -> PathBuf {
        self.openvpn_dir.join("tls-auth.key")
    }

    /// Dynamic address-pool ledger.
    pub fn pool_ledger(&self) -> PathBuf {
        self.openvpn_dir.join("ipp.txt")
    }
}

impl Default for PkiPaths {
    fn default() -> Self {
        let easy_rsa_dir = PathBuf::from("/etc/openvpn/easy-rsa");
        Self {
            index_file: easy_rsa_dir.join("pki/index.txt"),
            easy_rsa_dir,
            openvpn_dir: PathBuf::from("/etc/openvpn"),
            client_config_dir: PathBuf::from("/root"),
            client_template: PathBuf::from("/etc/openvpn/client-template.txt"),
            server_conf: PathBuf::from("/etc/openvpn/server.conf"),
        }
    }
}

fn env_path(var: &str, default: PathBuf) -> PathBuf {
    match std::env::var_os(var) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default,
    }
}

/// Paths rooted at a single directory, for tests and non-standard layouts.
impl PkiPaths {
    /// Derive a standard layout under `root`: `root/easy-rsa`,
    /// `root/openvpn`, `root/clients`.
    pub fn under_root(root: &Path) -> Self {
        let easy_rsa_dir = root.join("easy-rsa");
        let openvpn_dir = root.join("openvpn");
        Self {
            index_file: easy_rsa_dir.join("pki/index.txt"),
            client_template: openvpn_dir.join("client-template.txt"),
            server_conf: openvpn_dir.join("server.conf"),
            client_config_dir: root.join("clients"),
            easy_rsa_dir,
            openvpn_dir,
        }
    }
}
