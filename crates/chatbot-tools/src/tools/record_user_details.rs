use std::sync::Arc;

use async_trait::async_trait;
use chatbot_core::persona::RECORD_USER_DETAILS_TOOL;
use chatbot_core::tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::json;

use crate::notifier::{notify_best_effort, Notifier};
use crate::tools::{recorded_ok, NOT_PROVIDED};

#[derive(Debug, Deserialize)]
struct RecordUserDetailsArgs {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Forwards a visitor's contact request to the profile owner.
pub struct RecordUserDetailsTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUserDetailsTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn format_message(email: &str, name: Option<&str>, notes: Option<&str>) -> String {
        format!(
            "User {} with userid {} wants to connect with context {}",
            name.unwrap_or(NOT_PROVIDED),
            email,
            notes.unwrap_or(NOT_PROVIDED)
        )
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn name(&self) -> &str {
        RECORD_USER_DETAILS_TOOL
    }

    fn description(&self) -> &str {
        "Use this tool to record and send Connection Requests of a person with his name, email and Notes"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "Email Id of connection"
                },
                "name": {
                    "type": "string",
                    "description": "Name of Connection"
                },
                "notes": {
                    "type": "string",
                    "description": "Giving relevant context of conservation/history."
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: RecordUserDetailsArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let message =
            Self::format_message(&args.email, args.name.as_deref(), args.notes.as_deref());
        notify_best_effort(self.notifier.as_ref(), &message).await;

        Ok(recorded_ok())
    }
}
