//! Server configuration.

use std::path::PathBuf;

use vpnadmin_pki::PkiPaths;

/// Server configuration.
pub struct Config {
    /// HTTP bind address.
    pub bind_addr: String,

    /// HS256 signing secret for login tokens.
    pub jwt_secret: String,

    /// Login token lifetime in days.
    pub token_ttl_days: i64,

    /// JSON user store location.
    pub users_file: PathBuf,

    /// Filesystem layout of the PKI and OpenVPN directories.
    pub pki_paths: PkiPaths,
}

impl Config {
    /// Build configuration from environment variables, falling back to
    /// defaults.
    ///
    /// `JWT_SECRET` must be set; running an authentication endpoint on a
    /// compiled-in secret is not an option.
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            token_ttl_days: 5,
            users_file: std::env::var_os("USERS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("users.json")),
            pki_paths: PkiPaths::from_env(),
        })
    }
}
