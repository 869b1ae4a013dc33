//! OpenAI-compatible request serialization and response parsing.
//!
//! Gemini, OpenAI and most gateways accept the chat completions shape, so one
//! builder covers them all. Only the fields the chat completions API knows
//! about are emitted.

use chatbot_core::{Message, Role, ToolCall, ToolSchema};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::provider::{LLMError, Result};
use crate::types::LLMResponse;

/// Convert internal [`Message`] values to an OpenAI-compatible JSON array.
pub fn messages_to_openai_compat_json(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            };

            let mut msg = json!({
                "role": role,
                "content": m.content,
            });

            if let Some(tool_call_id) = &m.tool_call_id {
                msg["tool_call_id"] = json!(tool_call_id);
            }

            if let Some(tool_calls) = &m.tool_calls {
                msg["tool_calls"] = json!(tool_calls);
                if m.content.is_empty() {
                    msg["content"] = Value::Null;
                }
            }

            msg
        })
        .collect()
}

/// Convert internal [`ToolSchema`] values to the OpenAI `tools` array JSON.
pub fn tools_to_openai_compat_json(tools: &[ToolSchema]) -> Vec<Value> {
    tools.iter().map(|t| json!(t)).collect()
}

/// Build a non-streaming chat completions request body.
pub fn build_openai_compat_body(model: &str, messages: &[Message], tools: &[ToolSchema]) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages_to_openai_compat_json(messages),
        "stream": false,
    });

    // Some compatible backends reject an empty `tools` array.
    if !tools.is_empty() {
        body["tools"] = json!(tools_to_openai_compat_json(tools));
    }

    body
}

// --- OpenAI-compatible response parsing ---

#[derive(Debug, Deserialize)]
struct OpenAICompatResponse {
    #[serde(default)]
    choices: Vec<OpenAICompatChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAICompatChoice {
    message: OpenAICompatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OpenAICompatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

/// Parse a chat completions response body. Only the first choice is used.
pub fn parse_openai_compat_response(body: &str) -> Result<LLMResponse> {
    let response: OpenAICompatResponse = serde_json::from_str(body)?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LLMError::EmptyResponse)?;

    Ok(LLMResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls: choice.message.tool_calls.unwrap_or_default(),
        finish_reason: choice.finish_reason,
    })
}
