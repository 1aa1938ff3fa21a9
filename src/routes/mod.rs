//! HTTP routes for the completion gateway
//!
//! Each service mounts the shared routes plus its own endpoint.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod sentiment;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::HeaderValue,
    routing::{get, post},
    BoxError, Json, Router,
};
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::{
    completion::CompletionError,
    config::{Config, CorsOrigins, Service},
    docs::openapi_for,
    error::AppError,
    AppState,
};

/// Turn a failure from the inbound middleware stack into an error response
///
/// An expired request deadline is reported like an upstream timeout, with the
/// usual JSON error body.
fn middleware_error(err: BoxError, request_timeout: Duration) -> AppError {
    if err.is::<Elapsed>() {
        warn!(
            timeout_secs = request_timeout.as_secs(),
            "Request deadline expired"
        );
        AppError::Completion(CompletionError::Timeout(request_timeout.as_secs()))
    } else {
        error!(error = %err, "Unhandled middleware error");
        AppError::Internal(anyhow::anyhow!(err.to_string()))
    }
}

/// Build the CORS layer from configuration
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Create the application router for the configured service
pub fn create_router(state: Arc<AppState>) -> Router {
    let service = state.config.service;
    let openapi = openapi_for(service);

    // Routes shared by both services
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route(
            "/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        );

    let service_routes = match service {
        Service::Sentiment => {
            Router::new().route("/sentiment", post(sentiment::classify_sentiment))
        }
        Service::Coach => Router::new().route("/api/chat", post(chat::chat)),
    };

    let request_timeout = state.config.request_timeout;

    Router::new()
        .merge(public_routes)
        .merge(service_routes)
        // Global middleware (applied to all routes)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, request_timeout)
                }))
                .timeout(request_timeout),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}
