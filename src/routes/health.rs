//! Health and landing endpoints
//!
//! - `/health` - liveness only, never touches the upstream
//! - `/` - service metadata, or the coach landing page

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::{config::Service, AppState};

/// Liveness response
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Service metadata returned at `/`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

fn service_info(service: Service) -> ServiceInfo {
    let (message, endpoints) = match service {
        Service::Sentiment => ("Sentiment Analysis API", ["/health", "/sentiment"]),
        Service::Coach => ("Supportive Mental Coach", ["/health", "/api/chat"]),
    };
    ServiceInfo {
        message: message.to_string(),
        version: "1.0".to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    }
}

/// Root endpoint
///
/// The coach serves its landing page verbatim when the file is readable and
/// falls back to metadata otherwise.
pub async fn root(State(state): State<Arc<AppState>>) -> Response {
    let service = state.config.service;

    if service == Service::Coach {
        match tokio::fs::read_to_string(&state.config.landing_page_path).await {
            Ok(page) => return Html(page).into_response(),
            Err(e) => warn!(
                path = %state.config.landing_page_path,
                error = %e,
                "Landing page unavailable, serving metadata"
            ),
        }
    }

    Json(service_info(service)).into_response()
}
