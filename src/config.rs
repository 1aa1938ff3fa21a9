//! Configuration management for the completion gateway
//!
//! Configuration is loaded from environment variables once at startup and
//! shared read-only afterwards. A missing `OPENAI_API_KEY` is fatal.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use axum::http::HeaderValue;

/// Which gateway this process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Structured sentiment classification (`POST /sentiment`)
    Sentiment,
    /// Free-text supportive coaching (`POST /api/chat`)
    Coach,
}

impl Service {
    /// Stable lowercase name used in logs, metrics and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Sentiment => "sentiment",
            Service::Coach => "coach",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentiment" => Ok(Service::Sentiment),
            "coach" | "chat" => Ok(Service::Coach),
            other => Err(anyhow!(
                "unknown service '{}', expected 'sentiment' or 'coach'",
                other
            )),
        }
    }
}

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin, method and header
    Any,
    /// Only the listed origins
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Gateway served by this process
    pub service: Service,
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// OpenAI API URL
    pub openai_api_url: String,
    /// OpenAI API key (required)
    pub openai_api_key: String,

    /// Model used by the sentiment gateway
    pub sentiment_model: String,
    /// Model used by the coaching gateway
    pub coach_model: String,

    /// Timeout for a single upstream completion
    pub upstream_timeout: Duration,
    /// Timeout for a whole inbound request
    pub request_timeout: Duration,

    /// CORS origin policy
    pub cors_origins: CorsOrigins,

    /// Static landing page served at `/` by the coaching gateway
    pub landing_page_path: String,
}

// The API key is kept out of Debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("service", &self.service)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_api_key", &"<redacted>")
            .field("sentiment_model", &self.sentiment_model)
            .field("coach_model", &self.coach_model)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("cors_origins", &self.cors_origins)
            .field("landing_page_path", &self.landing_page_path)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let openai_api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .context("OPENAI_API_KEY must be set")?;
        if HeaderValue::from_str(&format!("Bearer {}", openai_api_key)).is_err() {
            bail!("OPENAI_API_KEY contains characters not allowed in an HTTP header");
        }

        let upstream_timeout_seconds: u64 = var_or("UPSTREAM_TIMEOUT_SECONDS", "60")
            .parse()
            .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?;
        let request_timeout_seconds: u64 = var_or("REQUEST_TIMEOUT_SECONDS", "90")
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECONDS")?;
        if upstream_timeout_seconds == 0 || request_timeout_seconds == 0 {
            bail!("timeouts must be greater than zero");
        }
        // An inbound deadline at or below the upstream one would cut off the
        // upstream error before it can be reported.
        if request_timeout_seconds <= upstream_timeout_seconds {
            bail!(
                "REQUEST_TIMEOUT_SECONDS ({}) must exceed UPSTREAM_TIMEOUT_SECONDS ({})",
                request_timeout_seconds,
                upstream_timeout_seconds
            );
        }

        Ok(Self {
            service: var_or("GATEWAY_SERVICE", "sentiment")
                .parse()
                .context("Invalid GATEWAY_SERVICE")?,
            host: var_or("GATEWAY_HOST", "0.0.0.0"),
            port: var_or("GATEWAY_PORT", "8000")
                .parse()
                .context("Invalid GATEWAY_PORT")?,

            openai_api_url: var_or("OPENAI_API_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            openai_api_key,

            sentiment_model: var_or("SENTIMENT_MODEL", "gpt-4.1-mini"),
            coach_model: var_or("COACH_MODEL", "gpt-5"),

            upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
            request_timeout: Duration::from_secs(request_timeout_seconds),

            cors_origins: CorsOrigins::parse(&var_or("CORS_ALLOWED_ORIGINS", "*")),

            landing_page_path: var_or("LANDING_PAGE_PATH", "frontend/index.html"),
        })
    }

    /// Model identifier for the configured service
    pub fn active_model(&self) -> &str {
        match self.service {
            Service::Sentiment => &self.sentiment_model,
            Service::Coach => &self.coach_model,
        }
    }
}
