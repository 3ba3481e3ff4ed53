//! Client lifecycle handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::auth::AuthUser;
use crate::http::handlers::pki_error_response;
use crate::http::responses::{
    ClientListResponse, ConfigResponse, CreateClientRequest, CreateClientResponse,
    MessageResponse,
};
use crate::state::AppState;

/// List clients: valid names plus the full ledger view.
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    _caller: AuthUser,
) -> impl IntoResponse {
    let clients = match state.registry.list().await {
        Ok(clients) => clients,
        Err(e) => return pki_error_response(e).into_response(),
    };
    let identities = match state.registry.identities().await {
        Ok(identities) => identities,
        Err(e) => return pki_error_response(e).into_response(),
    };
    (
        StatusCode::OK,
        Json(ClientListResponse {
            clients,
            identities,
        }),
    )
        .into_response()
}

/// Issue a certificate and return the assembled bundle.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<CreateClientRequest>,
) -> impl IntoResponse {
    match state
        .registry
        .create(&req.client_name, req.use_password)
        .await
    {
        Ok(config) => {
            info!(client = %req.client_name, operator = %caller.0.sub, "Client created");
            (
                StatusCode::OK,
                Json(CreateClientResponse {
                    message: "Client created successfully".to_string(),
                    client_name: req.client_name,
                    config_file: config,
                }),
            )
                .into_response()
        }
        Err(e) => pki_error_response(e).into_response(),
    }
}

/// Revoke a client and clean up its artifacts.
pub async fn revoke_client(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.registry.revoke(&name).await {
        Ok(()) => {
            info!(client = %name, operator = %caller.0.sub, "Client revoked");
            (
                StatusCode::OK,
                Json(MessageResponse {
                    message: "Client removed successfully".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => pki_error_response(e).into_response(),
    }
}

/// Download a client's configuration bundle.
pub async fn client_config(
    State(state): State<Arc<AppState>>,
    _caller: AuthUser,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.registry.fetch_config(&name).await {
        Ok(config) => (StatusCode::OK, Json(ConfigResponse { config })).into_response(),
        Err(e) => pki_error_response(e).into_response(),
    }
}
