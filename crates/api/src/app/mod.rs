//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: configuration and engine-service wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::auth::TokenVerifier;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The login endpoints stay public: they run before the caller has
/// authenticated. Posting requires a bearer token.
pub fn build_app(services: Arc<services::AppServices>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let auth_state = middleware::AuthState { verifier };

    let protected = routes::authed_router()
        .layer(Extension(Arc::clone(&services)))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/login/rate-limit", post(routes::login::check_rate_limit))
        .route("/login/attempts", post(routes::login::record_attempt))
        .layer(Extension(services))
        .merge(protected)
}
