use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use devforum_core::DomainError;

/// Map a domain rejection to a JSON error response.
///
/// Policy rejections carry the retry-hint data the client needs alongside the
/// stable error code; infrastructure failures stay opaque.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidArgument(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_argument", msg)
        }
        DomainError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "missing or invalid caller identity",
        ),
        DomainError::DuplicateSubmission { window_secs } => (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(json!({
                "error": "duplicate_submission",
                "message": format!("an identical question was posted within the last {window_secs}s"),
                "windowSecs": window_secs,
            })),
        )
            .into_response(),
        DomainError::LockedOut {
            locked_until,
            remaining_minutes,
        } => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "error": "locked_out",
                "message": format!("too many failed attempts; try again in {remaining_minutes} minutes"),
                "lockedUntil": locked_until.to_rfc3339(),
                "remainingMinutes": remaining_minutes,
            })),
        )
            .into_response(),
        DomainError::AccountNotFound => {
            json_error(StatusCode::NOT_FOUND, "account_not_found", "account not found")
        }
        DomainError::InsufficientFunds { balance, required } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            axum::Json(json!({
                "error": "insufficient_funds",
                "message": format!("balance {balance} cannot cover cost {required}"),
                "balance": balance,
                "required": required,
            })),
        )
            .into_response(),
        DomainError::Contention { .. } => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "transient",
            "the operation hit a write conflict; retry",
        ),
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
