use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::rate_limit::Denial;

// Anything that can go wrong talking to the completion provider.
//
// Display text is what callers see in the `error` field.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    // provider's own message, passed through untouched
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected provider response: {0}")]
    Malformed(String),
    #[error("provider returned no content")]
    EmptyContent,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Rate limit exceeded")]
    RateLimited(Denial),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RateLimited(denial) => {
                let body = Json(json!({
                    "error": "Rate limit exceeded",
                    "detail": denial.detail(),
                }));
                // round up so clients never retry a moment too early
                let secs = denial.retry_after.as_secs() + u64::from(denial.retry_after.subsec_nanos() > 0);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, secs.to_string())],
                    body,
                )
                    .into_response()
            }
            AppError::Provider(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
        }
    }
}
