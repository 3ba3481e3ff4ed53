//! HTTP request and response types.

use serde::{Deserialize, Serialize};
use vpnadmin_core::ClientIdentity;

use crate::users::Role;

// ============================================================================
// Auth types
// ============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

// ============================================================================
// Client lifecycle types
// ============================================================================

/// Request body for client creation. Field names match the original
/// management API's wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub client_name: String,

    /// Passphrase-protect the generated private key.
    #[serde(default)]
    pub use_password: bool,
}

/// Response body for client creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientResponse {
    pub message: String,
    pub client_name: String,
    pub config_file: String,
}

/// Response body for the client listing.
#[derive(Debug, Serialize)]
pub struct ClientListResponse {
    /// Currently valid client names.
    pub clients: Vec<String>,

    /// Full ledger view including revoked and expired identities.
    pub identities: Vec<ClientIdentity>,
}

/// Response body for a configuration download.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config: String,
}

// ============================================================================
// Shared types
// ============================================================================

/// Generic success message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
