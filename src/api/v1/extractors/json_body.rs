use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` と同じだが、失敗時は AppError (400 / INVALID_BODY) の envelope で返す
/// serde の詳細メッセージはレスポンスに出さず debug ログのみ
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "request body rejected");
                Err(AppError::bad_request("INVALID_BODY", rejection_message(&rejection)))
            }
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "Request body is missing required fields or has invalid values",
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
        _ => "Request body could not be read",
    }
}
