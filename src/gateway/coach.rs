//! Coaching gateway
//!
//! Wraps a user message behind a fixed supportive-coach persona and returns
//! the model's reply untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::completion::{ChatMessage, CompletionClient, CompletionError};

const COACH_PERSONA: &str = "You are a supportive mental coach. \
    Help users manage stress, emotions, and motivation. \
    Be kind, concise, and practical. \
    Response MUST be concise and less than 600 words";

/// Coaching request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoachRequest {
    #[schema(example = "I'm stressed about exams")]
    pub message: String,
}

/// Coaching reply; may be empty
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct CoachReply {
    pub reply: String,
}

/// Coaching gateway over a completion client
pub struct CoachGateway {
    client: Arc<dyn CompletionClient>,
}

impl CoachGateway {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Produce a reply to `message`
    #[instrument(skip_all, fields(message_len = message.len()))]
    pub async fn respond(&self, message: &str) -> Result<CoachReply, CompletionError> {
        let messages = [ChatMessage::system(COACH_PERSONA), ChatMessage::user(message)];

        let reply = self.client.complete_text(&messages).await?;

        debug!(reply_len = reply.len(), "Coach reply received");
        Ok(CoachReply { reply })
    }
}
