use crate::types::LLMResponse;
use async_trait::async_trait;
use chatbot_core::{Message, ToolSchema};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty response: no choices returned")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LLMError>;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Single chat completion round.
    ///
    /// # Arguments
    /// * `messages` - Full conversation transcript, system prompt first
    /// * `tools` - Tool catalog the model may invoke
    /// * `model` - Optional model override. If None, uses the provider's default model
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        model: Option<&str>,
    ) -> Result<LLMResponse>;
}
