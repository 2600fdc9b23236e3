use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Pre-authentication gate: may this identifier attempt a login right now?
pub async fn check_rate_limit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRateLimitRequest>,
) -> axum::response::Response {
    let identifier = match dto::parse_identifier(&body.identifier) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.check_login_allowed(identifier) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(serde_json::json!({ "allowed": true })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Report the outcome of an authentication attempt.
pub async fn record_attempt(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginAttemptRequest>,
) -> axum::response::Response {
    let identifier = match dto::parse_identifier(&body.identifier) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.record_login_attempt(identifier, body.success) {
        Ok(failed_attempts) => {
            let mut payload = serde_json::json!({ "recorded": true });
            if let Some(n) = failed_attempts {
                payload["failedAttempts"] = serde_json::json!(n);
            }
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
