use axum::{routing::post, Router};

pub mod login;
pub mod questions;
pub mod system;

/// Router for the authenticated endpoints.
pub fn authed_router() -> Router {
    Router::new().route("/questions", post(questions::post_question))
}
