use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse};

use devforum_questions::QuestionDraft;

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub async fn post_question(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::PostQuestionRequest>,
) -> axum::response::Response {
    let category = match dto::parse_category(&body.category) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    // Field bounds are checked before any store access.
    let draft = match QuestionDraft::new(body.title, body.body, body.attachment, category) {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let receipt = match services.post_question(caller.account_id(), &draft) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "questionId": receipt.question_id.to_string(),
            "remainingBalance": receipt.remaining_balance,
        })),
    )
        .into_response()
}
