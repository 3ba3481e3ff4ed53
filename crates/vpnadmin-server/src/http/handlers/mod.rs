//! HTTP request handlers.

mod accounts;
mod clients;
mod health;

pub use accounts::{create_user, login};
pub use clients::{client_config, create_client, list_clients, revoke_client};
pub use health::health_check;

use axum::{http::StatusCode, Json};
use tracing::error;
use vpnadmin_pki::PkiError;

use crate::http::responses::ErrorResponse;

/// Map a domain error to an HTTP response.
///
/// Raw toolchain output never leaves the server; it is logged here and
/// the client sees a generic message.
pub(crate) fn pki_error_response(err: PkiError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        PkiError::InvalidName(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        PkiError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
        PkiError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        PkiError::LedgerUnreadable(_)
        | PkiError::MissingMaterial(_)
        | PkiError::ToolchainFailure(_)
        | PkiError::Filesystem(_)
        | PkiError::Spawn(_)
        | PkiError::Timeout(_) => {
            error!(error = %err, "PKI operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PKI operation failed".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message }))
}
