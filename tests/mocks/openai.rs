//! Mock OpenAI chat completions API for testing
//!
//! Provides wiremock-based mocks for `POST /v1/chat/completions` covering
//! structured payloads, plain replies, refusals and provider errors.
//!
//! # Example
//!
//! ```rust,ignore
//! let openai = MockOpenAI::start().await;
//! openai.mock_structured_payload(json!({"label": "positive", "confidence": 0.9})).await;
//! // Use openai.api_url() as OPENAI_API_URL
//! ```

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants::TEST_OPENAI_API_KEY;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Mock OpenAI server wrapper
pub struct MockOpenAI {
    server: MockServer,
}

impl MockOpenAI {
    /// Start a new mock OpenAI server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base API URL, including the `/v1` prefix
    pub fn api_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Requests received so far
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Build a chat completion envelope around a single message
    pub fn completion_body(message: Value, finish_reason: &str) -> Value {
        json!({
            "id": "chatcmpl-test123",
            "object": "chat.completion",
            "created": 1706745600,
            "model": "gpt-test",
            "choices": [{
                "index": 0,
                "message": message,
                "finish_reason": finish_reason
            }],
            "usage": {
                "prompt_tokens": 42,
                "completion_tokens": 12,
                "total_tokens": 54
            }
        })
    }

    // =========================================================================
    // Structured output
    // =========================================================================

    /// Respond to structured requests with `payload` serialized as content
    pub async fn mock_structured_payload(&self, payload: Value) {
        self.mock_structured_content(&payload.to_string()).await;
    }

    /// Respond to structured requests with raw `content`
    pub async fn mock_structured_content(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header(
                "Authorization",
                format!("Bearer {}", TEST_OPENAI_API_KEY).as_str(),
            ))
            .and(body_partial_json(json!({
                "response_format": {
                    "type": "json_schema",
                    "json_schema": { "name": "sentiment_result", "strict": true }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": content }),
                "stop",
            )))
            .mount(&self.server)
            .await;
    }

    /// Respond once with `payload`, then fall through to later mocks
    pub async fn mock_structured_payload_once(&self, payload: Value) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": payload.to_string() }),
                "stop",
            )))
            .up_to_n_times(1)
            .mount(&self.server)
            .await;
    }

    /// Respond with a model refusal
    pub async fn mock_refusal(&self, refusal: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": null, "refusal": refusal }),
                "stop",
            )))
            .mount(&self.server)
            .await;
    }

    /// Respond with content cut off by the token limit
    pub async fn mock_truncated(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": "{\"label\": \"posi" }),
                "length",
            )))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Plain text
    // =========================================================================

    /// Respond to unconstrained requests with `reply`
    pub async fn mock_text_reply(&self, reply: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header(
                "Authorization",
                format!("Bearer {}", TEST_OPENAI_API_KEY).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": reply }),
                "stop",
            )))
            .mount(&self.server)
            .await;
    }

    /// Respond with `reply` after `delay_secs`
    pub async fn mock_slow_reply(&self, reply: &str, delay_secs: u64) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::completion_body(
                        json!({ "role": "assistant", "content": reply }),
                        "stop",
                    ))
                    .set_delay(Duration::from_secs(delay_secs)),
            )
            .mount(&self.server)
            .await;
    }

    /// Respond with a message that has no content at all
    pub async fn mock_null_content(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::completion_body(
                json!({ "role": "assistant", "content": null }),
                "stop",
            )))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Respond with an OpenAI-style error envelope
    pub async fn mock_error(&self, status: u16, message: &str, retry_after: Option<u64>) {
        let mut template = ResponseTemplate::new(status).set_body_json(json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "param": null,
                "code": null
            }
        }));
        if let Some(secs) = retry_after {
            template = template.insert_header("Retry-After", secs.to_string().as_str());
        }

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Respond with a body that is not a completion envelope
    pub async fn mock_garbage(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
            .mount(&self.server)
            .await;
    }
}
