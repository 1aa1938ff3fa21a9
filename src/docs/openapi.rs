//! OpenAPI specifications for the two gateways

use utoipa::OpenApi;

use crate::{
    config::Service,
    error::{ErrorBody, ErrorResponse},
    gateway::{CoachReply, CoachRequest, SentimentLabel, SentimentRequest, SentimentResult},
    routes::health::{HealthResponse, ServiceInfo},
};

/// OpenAPI specification for the sentiment gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sentiment API",
        version = "1.0",
        description = "Schema-validated sentiment classification"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::sentiment::classify_sentiment
    ),
    components(schemas(
        SentimentRequest,
        SentimentLabel,
        SentimentResult,
        HealthResponse,
        ServiceInfo,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Sentiment", description = "Sentiment classification"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct SentimentApiDoc;

/// OpenAPI specification for the coaching gateway
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Supportive Mental Coach",
        version = "1.0",
        description = "Free-text coaching replies"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::chat::chat
    ),
    components(schemas(
        CoachRequest,
        CoachReply,
        HealthResponse,
        ServiceInfo,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Coach", description = "Coaching chat"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct CoachApiDoc;

/// OpenAPI document for `service`
pub fn openapi_for(service: Service) -> utoipa::openapi::OpenApi {
    match service {
        Service::Sentiment => SentimentApiDoc::openapi(),
        Service::Coach => CoachApiDoc::openapi(),
    }
}
