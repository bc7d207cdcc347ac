pub mod client;
pub mod gateway;
pub mod gateways;
pub mod models;

pub use client::{strip_code_fences, InferenceClient, ModelReply, DEFAULT_MODEL};
pub use gateway::{ChatGateway, GatewayReply};
pub use models::{ChatMessage, ChatRequest, ContentPart, MessageContent, MessageRole};
