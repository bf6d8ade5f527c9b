use axum::{
    body::Bytes,
    extract::{ConnectInfo, State, rejection::BytesRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::identity::rate_limit_key;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::rate_limit::Decision;
use crate::relay::generate_exam;
use crate::state::AppState;

// Body is only read for the rate limit key, never forwarded.
// An unreadable body (too large, broken stream) keys by address like any other.
pub async fn generate_exam_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    REQUEST_TOTAL.inc();

    if let Err(e) = &body {
        debug!(error = %e, "request body unreadable, keying by address");
    }
    let key = rate_limit_key(body.as_deref().unwrap_or_default(), addr);
    if let Decision::Denied(denial) = state.rate_limiter.check(&key) {
        RATE_LIMITED_TOTAL.inc();
        warn!(%key, window = denial.window.name, "rate limit exceeded");
        return Err(AppError::RateLimited(denial));
    }
    debug!(%key, "request allowed");

    let content = generate_exam(state.provider.as_ref()).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        content,
    )
        .into_response())
}
