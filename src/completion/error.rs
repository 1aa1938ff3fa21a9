//! Completion failure taxonomy
//!
//! Every upstream failure is classified so callers can tell transient
//! conditions (worth retrying) from permanent ones.

use thiserror::Error;

/// Failure of a single completion round trip
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompletionError {
    /// Network failure or upstream 5xx
    #[error("upstream unavailable: {0}")]
    Transport(String),

    /// The upstream did not answer within the configured timeout
    #[error("upstream timed out after {0}s")]
    Timeout(u64),

    /// The upstream rejected our credentials (401/403)
    #[error("upstream rejected credentials")]
    Auth,

    /// The upstream asked us to slow down (429)
    #[error("upstream rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    /// The upstream envelope was missing, truncated, or a refusal
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    /// The structured payload did not match the expected shape
    #[error("upstream payload violated schema '{schema}': {reason}")]
    SchemaViolation { schema: String, reason: String },

    /// Any other non-success status
    #[error("upstream error {status}: {message}")]
    Unknown { status: u16, message: String },
}

impl CompletionError {
    /// Short, stable name used for metrics labels and logs
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Transport(_) => "transport",
            CompletionError::Timeout(_) => "timeout",
            CompletionError::Auth => "auth",
            CompletionError::RateLimited { .. } => "rate_limit",
            CompletionError::InvalidResponse(_) => "invalid_response",
            CompletionError::SchemaViolation { .. } => "schema_violation",
            CompletionError::Unknown { .. } => "unknown",
        }
    }

    /// Whether repeating the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Transport(_)
                | CompletionError::Timeout(_)
                | CompletionError::RateLimited { .. }
        )
    }

    /// Build a schema violation for the named schema
    pub fn schema_violation(schema: &str, reason: impl Into<String>) -> Self {
        CompletionError::SchemaViolation {
            schema: schema.to_string(),
            reason: reason.into(),
        }
    }
}
