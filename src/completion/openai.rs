//! OpenAI chat completions client
//!
//! The only place that knows the provider's wire details: endpoint, auth
//! header, model identifier and response envelope.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionClient,
    CompletionError, OutputSchema, ProviderErrorResponse,
};
use crate::{config::Config, routes::metrics::record_upstream_call};

/// OpenAI client bound to a single model
pub struct OpenAIClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl OpenAIClient {
    /// Create a client for the model of the configured service
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.active_model().to_string(),
            timeout_secs: config.upstream_timeout.as_secs(),
        }
    }

    /// POST a chat completion and return the first choice
    async fn chat_completion(
        &self,
        operation: &'static str,
        request: &ChatCompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let start = Instant::now();

        let result = self.send(&url, request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        record_upstream_call(operation, &self.model, outcome, start.elapsed().as_secs_f64());

        let response = result?;
        if let Some(usage) = &response.usage {
            debug!(
                operation,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Upstream usage"
            );
        }
        info!(
            operation,
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "Upstream completion finished"
        );
        Ok(response)
    }

    async fn send(
        &self,
        url: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let headers = self.default_headers()?;

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response.headers().get(RETRY_AFTER).and_then(parse_retry_after);
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &text, retry_after));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(self.timeout_secs)
                } else {
                    CompletionError::InvalidResponse(format!("malformed response body: {}", e))
                }
            })
    }

    /// Build default headers for provider requests
    fn default_headers(&self) -> Result<HeaderMap, CompletionError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| CompletionError::Auth)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            warn!(timeout_secs = self.timeout_secs, "Upstream request timed out");
            CompletionError::Timeout(self.timeout_secs)
        } else {
            let e = e.without_url();
            error!(error = %e, "Failed to reach upstream");
            CompletionError::Transport(e.to_string())
        }
    }
}

/// Read a `Retry-After` value given in delay-seconds
///
/// The HTTP-date form is not parsed; OpenAI sends seconds, and a date yields
/// `None` so no header is forwarded rather than a wrong one.
pub(crate) fn parse_retry_after(value: &HeaderValue) -> Option<u64> {
    value.to_str().ok()?.trim().parse().ok()
}

/// Map a non-success upstream status to a completion error
///
/// Only the provider's `error.message` is kept; auth failures get a fixed
/// message since providers echo part of the rejected key back.
pub(crate) fn classify_status(
    status: StatusCode,
    body: &str,
    retry_after: Option<u64>,
) -> CompletionError {
    let message = serde_json::from_str::<ProviderErrorResponse>(body)
        .map(|r| r.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Auth,
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited {
            message,
            retry_after,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CompletionError::Transport(format!("{}: {}", status, message))
        }
        s if s.is_server_error() => CompletionError::Transport(format!("{}: {}", status, message)),
        s => CompletionError::Unknown {
            status: s.as_u16(),
            message,
        },
    }
}

/// Take the single choice out of a response, rejecting refusals and truncation
fn first_choice_content(
    response: ChatCompletionResponse,
) -> Result<Option<String>, CompletionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::InvalidResponse("response contained no choices".into()))?;

    if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
        return Err(CompletionError::InvalidResponse(format!(
            "model refused: {}",
            refusal
        )));
    }

    Ok(choice.message.content)
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, schema = schema.name()))]
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value, CompletionError> {
        let messages = [
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ];
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            response_format: Some(schema.response_format()),
        };

        let response = self.chat_completion("structured", &request).await?;

        let finish_reason = response
            .choices
            .first()
            .and_then(|c| c.finish_reason.clone());
        if finish_reason.as_deref() == Some("length") {
            return Err(CompletionError::InvalidResponse(
                "structured output was truncated".into(),
            ));
        }

        let content = first_choice_content(response)?
            .ok_or_else(|| CompletionError::InvalidResponse("structured output was empty".into()))?;

        serde_json::from_str(&content)
            .map_err(|e| CompletionError::schema_violation(schema.name(), format!("not JSON: {}", e)))
    }

    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete_text(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            response_format: None,
        };

        let response = self.chat_completion("text", &request).await?;
        Ok(first_choice_content(response)?.unwrap_or_default())
    }
}
