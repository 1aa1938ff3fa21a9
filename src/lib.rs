//! Completion Gateway - sentiment and coaching services over an LLM provider
//!
//! This library provides the core functionality for both gateways: the
//! completion client abstraction, schema-validated structured output, the
//! gateways themselves, and the HTTP surface.

pub mod completion;
pub mod config;
pub mod docs;
pub mod error;
pub mod gateway;
pub mod routes;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::completion::{CompletionClient, CompletionError, OpenAIClient};
pub use crate::config::{Config, Service};
pub use crate::gateway::{CoachGateway, SentimentGateway};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Completion provider shared by both gateways
    pub completion_client: Arc<dyn CompletionClient>,
    pub sentiment: SentimentGateway,
    pub coach: CoachGateway,
}

impl AppState {
    /// Create a new application state backed by the OpenAI client
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling and bounded timeouts
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.upstream_timeout)
            .build()?;

        let completion_client: Arc<dyn CompletionClient> =
            Arc::new(OpenAIClient::new(http_client, &config));

        Self::with_client(config, completion_client)
    }

    /// Create an application state around an arbitrary completion client
    ///
    /// Used by tests to substitute a stub provider.
    pub fn with_client(config: Config, completion_client: Arc<dyn CompletionClient>) -> Result<Self> {
        Ok(Self {
            sentiment: SentimentGateway::new(completion_client.clone())?,
            coach: CoachGateway::new(completion_client.clone()),
            config,
            start_time: Instant::now(),
            completion_client,
        })
    }
}
