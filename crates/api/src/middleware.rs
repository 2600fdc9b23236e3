use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app::errors;
use crate::auth::TokenVerifier;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let account_id = match state.verifier.verify(token) {
        Ok(id) => id,
        Err(_) => return unauthenticated(),
    };

    req.extensions_mut().insert(CallerContext::new(account_id));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(unauthenticated)?;

    let header = header.to_str().map_err(|_| unauthenticated())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(unauthenticated)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(unauthenticated());
    }

    Ok(token)
}

fn unauthenticated() -> Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "missing or invalid bearer token",
    )
}
