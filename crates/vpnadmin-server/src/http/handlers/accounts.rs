//! Login and user management handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info, warn};

use crate::auth::AuthUser;
use crate::http::responses::{
    CreateUserRequest, ErrorResponse, LoginRequest, LoginResponse, MessageResponse,
};
use crate::state::AppState;
use crate::users::UserStoreError;

/// Login endpoint: verify credentials and issue a token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.username.is_empty() || req.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Username and password required".to_string(),
            }),
        )
            .into_response();
    }

    let role = match state.users.verify(&req.username, &req.password).await {
        Ok(Some(role)) => role,
        Ok(None) => {
            warn!(username = %req.username, "Login rejected");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid username or password".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "User store unavailable during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Login failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.tokens.issue(&req.username, role) {
        Ok(token) => {
            info!(username = %req.username, "Login succeeded");
            (StatusCode::OK, Json(LoginResponse { token })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to sign login token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Login failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Create a user account. Admin only.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = caller.require_admin() {
        return rejection.into_response();
    }

    if req.username.is_empty() || req.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Username, password, and role required".to_string(),
            }),
        )
            .into_response();
    }

    match state.users.add_user(&req.username, &req.password, req.role).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "User created successfully".to_string(),
            }),
        )
            .into_response(),
        Err(UserStoreError::DuplicateUsername(_)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Username already exists".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                }),
            )
                .into_response()
        }
    }
}
