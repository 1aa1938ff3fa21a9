//! Sentiment endpoint integration tests
//!
//! - POST /sentiment - schema-validated classification
//! - Upstream failures map to classified 5xx responses
//! - Invalid payloads never reach the caller as 200

use axum::http::StatusCode;
use completion_gateway::Service;
use serde_json::{json, Value};

use crate::common::{constants::UNREACHABLE_API_URL, server_for, test_config, GatewayTestHarness};

fn assert_sentiment_shape(json: &Value) {
    let label = json["label"].as_str().expect("label should be a string");
    assert!(
        ["positive", "neutral", "negative"].contains(&label),
        "unexpected label {}",
        label
    );
    let confidence = json["confidence"].as_f64().expect("confidence should be a number");
    assert!((0.0..=1.0).contains(&confidence), "confidence {} out of range", confidence);
}

#[tokio::test]
async fn test_positive_review_is_classified() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "positive", "confidence": 0.97 }))
        .await;

    let response = harness
        .server
        .post("/sentiment")
        .json(&json!({ "text": "This product is amazing!" }))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["label"], "positive");
    assert_sentiment_shape(&json);
}

#[tokio::test]
async fn test_upstream_request_embeds_review_and_schema() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "negative", "confidence": 0.8 }))
        .await;

    harness
        .server
        .post("/sentiment")
        .json(&json!({ "text": "Broke after two days." }))
        .await
        .assert_status_ok();

    let requests = harness.openai.received_requests().await;
    assert_eq!(requests.len(), 1, "exactly one upstream attempt");

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4.1-mini");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You are a strict sentiment classifier.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .ends_with("Review: Broke after two days."));

    let schema = &body["response_format"]["json_schema"]["schema"];
    assert_eq!(
        schema["properties"]["label"]["enum"],
        json!(["positive", "neutral", "negative"])
    );
    assert_eq!(schema["required"], json!(["label", "confidence"]));
}

#[tokio::test]
async fn test_repeated_requests_always_satisfy_shape() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload_once(json!({ "label": "positive", "confidence": 0.91 }))
        .await;
    harness
        .openai
        .mock_structured_payload_once(json!({ "label": "neutral", "confidence": 0.55 }))
        .await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "positive", "confidence": 1.0 }))
        .await;

    for _ in 0..3 {
        let response = harness
            .server
            .post("/sentiment")
            .json(&json!({ "text": "It's fine, I guess. Does the job." }))
            .await;
        response.assert_status_ok();
        assert_sentiment_shape(&response.json());
    }
}

#[tokio::test]
async fn test_empty_text_is_forwarded() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "neutral", "confidence": 0.5 }))
        .await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "" })).await;

    response.assert_status_ok();
    assert_eq!(harness.openai.received_requests().await.len(), 1);
}

#[tokio::test]
async fn test_unlisted_label_is_rejected() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "mixed", "confidence": 0.6 }))
        .await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "hmm" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_SCHEMA_VIOLATION");
    assert_eq!(json["error"]["retryable"], false);
    assert!(json.get("label").is_none());
}

#[tokio::test]
async fn test_out_of_range_confidence_is_rejected() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_structured_payload(json!({ "label": "positive", "confidence": 1.5 }))
        .await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "wow" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_SCHEMA_VIOLATION");
}

#[tokio::test]
async fn test_non_json_content_is_rejected() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness.openai.mock_structured_content("positive, pretty sure").await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "ok" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_SCHEMA_VIOLATION");
}

#[tokio::test]
async fn test_refusal_is_invalid_response() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness.openai.mock_refusal("I can't classify that.").await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "..." })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_INVALID_RESPONSE");
}

#[tokio::test]
async fn test_truncated_output_is_invalid_response() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness.openai.mock_truncated().await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "..." })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_INVALID_RESPONSE");
}

#[tokio::test]
async fn test_rate_limit_is_retryable_with_retry_after() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_error(429, "Rate limit reached for requests", Some(20))
        .await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "nice" })).await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers().get("retry-after").unwrap(), "20");
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_RATE_LIMITED");
    assert_eq!(json["error"]["retryable"], true);
}

#[tokio::test]
async fn test_auth_failure_does_not_leak_key() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;
    harness
        .openai
        .mock_error(401, "Incorrect API key provided: test-ope***-key", None)
        .await;

    let response = harness.server.post("/sentiment").json(&json!({ "text": "nice" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let text = response.text();
    assert!(!text.contains("test-ope"));
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_AUTH_FAILED");
}

#[tokio::test]
async fn test_transport_failure_is_server_error() {
    let server = server_for(test_config(Service::Sentiment, UNREACHABLE_API_URL, &[]));

    let response = server.post("/sentiment").json(&json!({ "text": "nice" })).await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "UPSTREAM_UNAVAILABLE");
    assert!(!json["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_text_field_is_rejected_locally() {
    let harness = GatewayTestHarness::new(Service::Sentiment).await;

    let response = harness
        .server
        .post("/sentiment")
        .json(&json!({ "review": "wrong field" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    assert!(harness.openai.received_requests().await.is_empty());
}
