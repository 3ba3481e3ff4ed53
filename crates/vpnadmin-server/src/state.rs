//! Shared application state.

use std::sync::Arc;

use vpnadmin_pki::ClientRegistry;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::users::UserStore;

/// Shared application state.
pub struct AppState {
    /// PKI client registry.
    pub registry: ClientRegistry,

    /// User accounts.
    pub users: UserStore,

    /// Login token issuer/verifier.
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(config: &Config) -> Arc<Self> {
        Arc::new(Self {
            registry: ClientRegistry::new(config.pki_paths.clone()),
            users: UserStore::new(config.users_file.clone()),
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_days),
        })
    }
}
