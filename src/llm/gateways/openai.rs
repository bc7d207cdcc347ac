//! OpenAI gateway for chat completions.
//!
//! Sends one JSON POST per call to `<base_url>/chat/completions` with a bearer
//! credential and a bounded timeout. Connection failures and timeouts become
//! [`PicNGoError::TransportFailure`]; any HTTP status is handed back to the
//! caller untouched.

use crate::error::{PicNGoError, Result};
use crate::llm::gateway::{ChatGateway, GatewayReply};
use crate::llm::models::ChatRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for connecting to the OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Gateway for the OpenAI chat-completions service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(OpenAIConfig::default())
    }

    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PicNGoError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create gateway pointed at a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatGateway for OpenAIGateway {
    async fn send(&self, request: &ChatRequest, credential: &str) -> Result<GatewayReply> {
        let url = self.completions_url();
        debug!(url = %url, model = %request.model, max_tokens = request.max_tokens, "Posting chat completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", credential))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Chat completion request failed: {}", e);
                PicNGoError::TransportFailure(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PicNGoError::TransportFailure(format!("failed to read response body: {}", e)))?;

        debug!(status, body_bytes = body.len(), "Received chat completion reply");
        Ok(GatewayReply { status, body })
    }
}
