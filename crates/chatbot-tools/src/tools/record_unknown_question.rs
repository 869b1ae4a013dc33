use std::sync::Arc;

use async_trait::async_trait;
use chatbot_core::persona::RECORD_UNKNOWN_QUESTION_TOOL;
use chatbot_core::tools::{Tool, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::json;

use crate::notifier::{notify_best_effort, Notifier};
use crate::tools::recorded_ok;

#[derive(Debug, Deserialize)]
struct RecordUnknownQuestionArgs {
    question: String,
}

/// Lets the profile owner know which questions the chatbot could not answer.
pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &str {
        RECORD_UNKNOWN_QUESTION_TOOL
    }

    fn description(&self) -> &str {
        "Always use this tool to record those questions which couldn't be answered since you didn't know the answer."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "Unknown question whose answer is not known"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: RecordUnknownQuestionArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let message = format!("Recorded unknown question: {}", args.question);
        notify_best_effort(self.notifier.as_ref(), &message).await;

        Ok(recorded_ok())
    }
}
