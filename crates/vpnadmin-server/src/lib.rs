//! vpnadmin HTTP Management API
//!
//! This crate exposes the PKI core over HTTP: JWT-protected endpoints for
//! listing, creating, and revoking VPN clients and downloading their
//! configuration bundles, plus login and user management backed by a
//! JSON user store.

pub mod auth;
pub mod config;
pub mod http;
pub mod state;
pub mod users;

pub use config::Config;
pub use state::AppState;
