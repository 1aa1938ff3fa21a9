//! Sentiment gateway
//!
//! Classifies text into a fixed three-way label with a confidence score,
//! using a schema-constrained completion. A result is only returned when it
//! passed the schema and the range check.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::completion::{complete_structured, CompletionClient, CompletionError, OutputSchema};

/// Name of the structured output schema sent upstream
pub const SENTIMENT_SCHEMA_NAME: &str = "sentiment_result";

const SYSTEM_PROMPT: &str = "You are a strict sentiment classifier.";

/// Sentiment classification request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentimentRequest {
    /// Raw customer product review
    #[schema(example = "This product is amazing!")]
    pub text: String,
}

/// Sentiment label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated sentiment classification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Confidence in the label, between 0 and 1
    #[schema(example = 0.97, minimum = 0.0, maximum = 1.0)]
    pub confidence: f64,
}

impl SentimentResult {
    /// Check the confidence range invariant
    pub fn validate(&self) -> Result<(), String> {
        if self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence) {
            Ok(())
        } else {
            Err(format!(
                "confidence {} is outside [0, 1]",
                self.confidence
            ))
        }
    }
}

/// JSON Schema for [`SentimentResult`]
pub fn sentiment_schema() -> Result<OutputSchema> {
    let labels: Vec<&str> = SentimentLabel::ALL.iter().map(|l| l.as_str()).collect();
    OutputSchema::new(
        SENTIMENT_SCHEMA_NAME,
        json!({
            "type": "object",
            "properties": {
                "label": {
                    "type": "string",
                    "enum": labels
                },
                "confidence": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 1
                }
            },
            "required": ["label", "confidence"],
            "additionalProperties": false
        }),
    )
}

fn user_prompt(text: &str) -> String {
    format!(
        "Classify the sentiment of the following product review.\n\
         Return ONLY JSON with keys: \"label\" in [\"positive\",\"neutral\",\"negative\"] and \"confidence\" (0..1).\n\
         Review: {}",
        text
    )
}

/// Sentiment gateway over a completion client
pub struct SentimentGateway {
    client: Arc<dyn CompletionClient>,
    schema: OutputSchema,
}

impl SentimentGateway {
    pub fn new(client: Arc<dyn CompletionClient>) -> Result<Self> {
        Ok(Self {
            client,
            schema: sentiment_schema()?,
        })
    }

    /// Classify `text`
    ///
    /// Empty text is forwarded as is. One upstream attempt per call.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<SentimentResult, CompletionError> {
        let result: SentimentResult = complete_structured(
            self.client.as_ref(),
            SYSTEM_PROMPT,
            &user_prompt(text),
            &self.schema,
        )
        .await?;

        result
            .validate()
            .map_err(|reason| CompletionError::schema_violation(self.schema.name(), reason))?;

        debug!(label = %result.label, confidence = result.confidence, "Sentiment classified");
        Ok(result)
    }
}
