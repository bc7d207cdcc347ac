use crate::error::{PicNGoError, Result};
use crate::llm::gateway::{ChatGateway, GatewayReply};
use crate::llm::models::{ChatMessage, ChatRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Vision-capable chat model used for every request
pub const DEFAULT_MODEL: &str = "gpt-4o";

const FENCE: &str = "```";

/// Remote inference over a chat-completion gateway.
///
/// One call to [`InferenceClient::infer`] performs at most one gateway request.
/// Nothing is retried and nothing is cached.
pub struct InferenceClient {
    model: String,
    gateway: Arc<dyn ChatGateway>,
}

impl InferenceClient {
    /// Create a client using the default model
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self::with_model(DEFAULT_MODEL, gateway)
    }

    pub fn with_model(model: impl Into<String>, gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    /// Send `messages` and return the model's reply with code fences removed
    pub async fn infer(
        &self,
        messages: &[ChatMessage],
        credential: &str,
        max_tokens: u32,
    ) -> Result<String> {
        self.infer_reply(messages, credential, max_tokens)
            .await
            .map(|reply| reply.text)
    }

    /// Like [`InferenceClient::infer`], but keeps the reply as received alongside the cleaned text
    pub async fn infer_reply(
        &self,
        messages: &[ChatMessage],
        credential: &str,
        max_tokens: u32,
    ) -> Result<ModelReply> {
        ensure_credential(credential)?;

        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens,
            messages: messages.to_vec(),
        };

        info!(model = %self.model, max_tokens, "Requesting chat completion");
        let reply = self.gateway.send(&request, credential.trim()).await?;

        let raw = extract_content(&reply)?;
        debug!(chars = raw.chars().count(), "Extracted model reply");
        Ok(ModelReply::new(raw))
    }
}

/// Reply content as the model sent it, plus the fence-stripped text to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub raw: String,
    pub text: String,
}

impl ModelReply {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let text = strip_code_fences(&raw);
        Self { raw, text }
    }
}

/// Fail with [`PicNGoError::MissingCredential`] when the credential is blank
pub fn ensure_credential(credential: &str) -> Result<()> {
    if credential.trim().is_empty() {
        return Err(PicNGoError::MissingCredential);
    }
    Ok(())
}

fn extract_content(reply: &GatewayReply) -> Result<String> {
    if !reply.is_success() {
        let message = serde_json::from_str::<Value>(&reply.body)
            .ok()
            .and_then(|body| body["error"]["message"].as_str().map(String::from));
        error!(status = reply.status, message = ?message, "Chat completion rejected");
        return Err(PicNGoError::HttpError {
            status: reply.status,
            message,
        });
    }

    let body: Value = serde_json::from_str(&reply.body)
        .map_err(|e| PicNGoError::MalformedResponse(format!("body is not JSON: {}", e)))?;

    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| PicNGoError::MalformedResponse("missing choices".to_string()))?;

    choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| PicNGoError::MalformedResponse("missing message content".to_string()))
}

/// Remove a markdown code fence wrapped around `text`.
///
/// The opening fence line (with any language tag) and a closing fence are
/// dropped and the remainder is trimmed. Text without a fence is returned as is.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with(FENCE) && !trimmed.ends_with(FENCE) {
        return text.to_string();
    }

    let mut cleaned = trimmed;
    if cleaned.starts_with(FENCE) {
        cleaned = match cleaned.split_once('\n') {
            Some((_, rest)) => rest.trim(),
            None => "",
        };
    }
    if let Some(inner) = cleaned.strip_suffix(FENCE) {
        cleaned = inner.trim();
    }
    cleaned.to_string()
}
