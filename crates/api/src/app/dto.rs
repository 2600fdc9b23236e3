use axum::http::StatusCode;
use serde::Deserialize;

use devforum_questions::Category;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct PostQuestionRequest {
    pub title: String,
    pub body: String,
    pub attachment: Option<String>,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRateLimitRequest {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginAttemptRequest {
    pub identifier: String,
    pub success: bool,
}

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_category(s: &str) -> Result<Category, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "flutter" => Ok(Category::Flutter),
        "firebase" => Ok(Category::Firebase),
        "dart" => Ok(Category::Dart),
        "backend" => Ok(Category::Backend),
        "design" => Ok(Category::Design),
        "other" => Ok(Category::Other),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_argument",
            "category must be one of: flutter, firebase, dart, backend, design, other",
        )),
    }
}

/// Identifiers (emails) key lock records; reject blank ones before they reach
/// the store.
pub fn parse_identifier(s: &str) -> Result<&str, axum::response::Response> {
    let identifier = s.trim();
    if identifier.is_empty() {
        return Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_argument",
            "identifier must not be empty",
        ));
    }
    Ok(identifier)
}
