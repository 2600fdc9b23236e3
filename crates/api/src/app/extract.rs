use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use crate::app::errors;

/// JSON body extractor that keeps rejections inside the error envelope.
///
/// A missing or wrong-typed field is caller error like any other: it must
/// answer 400 `invalid_argument`, not axum's plain-text default.
pub struct Json<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_argument",
                rejection.body_text(),
            )),
        }
    }
}
