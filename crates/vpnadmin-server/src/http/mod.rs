//! HTTP server for the management API.
//!
//! Provides endpoints for:
//! - Login (`/api/login`)
//! - User management (`/api/users`)
//! - Client lifecycle (`/api/clients`)
//! - Client configuration download (`/api/clients/:name/config`)
//! - Health check (`/health`)

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Auth routes
        .route("/api/login", post(handlers::login))
        .route("/api/users", post(handlers::create_user))
        // Client lifecycle routes
        .route("/api/clients", get(handlers::list_clients))
        .route("/api/clients", post(handlers::create_client))
        .route("/api/clients/:name", delete(handlers::revoke_client))
        .route("/api/clients/:name/config", get(handlers::client_config))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
