//! Completion client abstraction
//!
//! Defines the capability both gateways depend on. Any provider that can
//! run a schema-constrained completion and a plain text completion can be
//! substituted here without touching the gateways.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::{ChatMessage, CompletionError, OutputSchema};

/// Trait defining the interface for completion providers
///
/// Implementations own the credential and the transport. They MUST NOT
/// include the credential in any error they return.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Schema-constrained completion
    ///
    /// Returns the parsed JSON payload. Callers should go through
    /// [`complete_structured`], which validates it before use.
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &OutputSchema,
    ) -> Result<Value, CompletionError>;

    /// Unconstrained text completion
    ///
    /// A missing content field yields an empty string.
    async fn complete_text(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Run a structured completion and decode it into `T`
///
/// The payload is validated against `schema` locally whatever the provider
/// claims about its own schema enforcement.
pub async fn complete_structured<T>(
    client: &dyn CompletionClient,
    system_prompt: &str,
    user_prompt: &str,
    schema: &OutputSchema,
) -> Result<T, CompletionError>
where
    T: DeserializeOwned,
{
    let payload = client
        .complete_json(system_prompt, user_prompt, schema)
        .await?;

    if let Err(violations) = schema.validate(&payload) {
        warn!(
            provider = client.name(),
            schema = schema.name(),
            violations = violations.len(),
            "Structured payload failed schema validation"
        );
        return Err(CompletionError::schema_violation(
            schema.name(),
            violations.join("; "),
        ));
    }

    serde_json::from_value(payload)
        .map_err(|e| CompletionError::schema_violation(schema.name(), e.to_string()))
}
