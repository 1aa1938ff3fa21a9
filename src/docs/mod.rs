//! API Documentation module
//!
//! Provides OpenAPI specification generation for both gateways using utoipa.

mod openapi;

pub use openapi::{openapi_for, CoachApiDoc, SentimentApiDoc};
