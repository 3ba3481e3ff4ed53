//! Login tokens and request authentication.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::http::responses::ErrorResponse;
use crate::state::AppState;
use crate::users::Role;

/// JWT claims carried by a login token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// Role at login time.
    pub role: Role,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Errors from token issue/verify.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 login tokens.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for a freshly authenticated user.
    pub fn issue(&self, username: &str, role: Role) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            role,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Extractor for authenticated requests.
///
/// Pulls the bearer token from the `Authorization` header and verifies
/// it against the server's issuer. Handlers that need admin rights call
/// [`AuthUser::require_admin`].
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Reject non-admin callers.
    pub fn require_admin(&self) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
        if self.0.role == Role::Admin {
            Ok(())
        } else {
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Admin access required".to_string(),
                }),
            ))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = token else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Authentication token required".to_string(),
                }),
            ));
        };

        match state.tokens.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                warn!(error = %e, "Rejected request with invalid token");
                Err((
                    StatusCode::FORBIDDEN,
                    Json(ErrorResponse {
                        error: "Invalid or expired token".to_string(),
                    }),
                ))
            }
        }
    }
}
