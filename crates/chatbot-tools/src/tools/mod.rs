pub mod record_unknown_question;
pub mod record_user_details;

pub use record_unknown_question::RecordUnknownQuestionTool;
pub use record_user_details::RecordUserDetailsTool;

use chatbot_core::tools::ToolResult;
use serde_json::json;

/// Placeholder for optional contact fields the visitor did not give.
pub const NOT_PROVIDED: &str = "Not Provided";

/// Fixed acknowledgement returned by every recording tool.
pub fn recorded_ok() -> ToolResult {
    ToolResult::json(&json!({"recorded": "ok"}))
}
