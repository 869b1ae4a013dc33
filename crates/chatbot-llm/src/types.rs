use chatbot_core::ToolCall;
use serde::{Deserialize, Serialize};

/// Normalized, non-streaming chat completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LLMResponse {
    /// Text content; empty when the model only requested tools.
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<String>,
}

impl LLMResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            finish_reason: Some("stop".to_string()),
        }
    }

    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    /// A response is a tool invocation only when it actually carries calls to
    /// dispatch; a `tool_calls` finish reason with nothing attached is treated
    /// as a plain answer.
    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
