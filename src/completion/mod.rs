//! Completion module
//!
//! Handles round trips to the upstream language-model provider.

pub mod error;
pub mod openai;
pub mod provider;
pub mod schema;
pub mod types;

pub use error::CompletionError;
pub use openai::OpenAIClient;
pub use provider::{complete_structured, CompletionClient};
pub use schema::OutputSchema;
pub use types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ProviderErrorResponse, Role,
};
