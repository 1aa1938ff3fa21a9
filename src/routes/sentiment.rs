//! Sentiment endpoint
//!
//! `POST /sentiment` classifies a review into positive, neutral or negative.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::{
    error::{AppError, ErrorResponse},
    gateway::{SentimentRequest, SentimentResult},
    routes::metrics::record_request,
    AppState,
};

/// Classify the sentiment of a text
#[utoipa::path(
    post,
    path = "/sentiment",
    tag = "Sentiment",
    request_body = SentimentRequest,
    responses(
        (status = 200, description = "Validated classification", body = SentimentResult),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 502, description = "Upstream failure or invalid payload", body = ErrorResponse),
        (status = 503, description = "Upstream rate limited", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    )
)]
pub async fn classify_sentiment(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentResult>, AppError> {
    let start = Instant::now();
    let Json(request) = payload.inspect_err(|_| record_request("sentiment", "invalid_request"))?;

    match state.sentiment.classify(&request.text).await {
        Ok(result) => {
            record_request("sentiment", "success");
            info!(
                label = %result.label,
                duration_ms = start.elapsed().as_millis() as u64,
                "Sentiment request completed"
            );
            Ok(Json(result))
        }
        Err(e) => {
            record_request("sentiment", e.kind());
            warn!(kind = e.kind(), error = %e, "Sentiment request failed");
            Err(e.into())
        }
    }
}
