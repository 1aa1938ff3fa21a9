//! Coaching chat endpoint
//!
//! `POST /api/chat` returns the coach's reply verbatim.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::{
    error::{AppError, ErrorResponse},
    gateway::{CoachReply, CoachRequest},
    routes::metrics::record_request,
    AppState,
};

/// Get a supportive reply to a message
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Coach",
    request_body = CoachRequest,
    responses(
        (status = 200, description = "Model reply, possibly empty", body = CoachReply),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Unclassified upstream error", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 503, description = "Upstream rate limited", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachReply>, AppError> {
    let start = Instant::now();
    let Json(request) = payload.inspect_err(|_| record_request("chat", "invalid_request"))?;

    match state.coach.respond(&request.message).await {
        Ok(reply) => {
            record_request("chat", "success");
            info!(
                reply_len = reply.reply.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Chat request completed"
            );
            Ok(Json(reply))
        }
        Err(e) => {
            record_request("chat", e.kind());
            warn!(kind = e.kind(), retryable = e.is_retryable(), error = %e, "Chat request failed");
            Err(e.into())
        }
    }
}
