use crate::error::Result;
use crate::llm::models::ChatRequest;
use async_trait::async_trait;

/// Raw HTTP reply from a chat-completion provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport to a chat-completion provider.
///
/// Implementations send exactly one request per call and never retry. Status
/// handling and body interpretation belong to the caller.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send(&self, request: &ChatRequest, credential: &str) -> Result<GatewayReply>;
}
