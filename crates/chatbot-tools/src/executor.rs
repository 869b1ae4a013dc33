use std::sync::Arc;

use async_trait::async_trait;
use chatbot_core::tools::{
    parse_tool_args, ToolCall, ToolError, ToolExecutor, ToolRegistry, ToolResult, ToolSchema,
};

use crate::notifier::Notifier;
use crate::tools::{RecordUnknownQuestionTool, RecordUserDetailsTool};

/// Tool executor backed by an explicit [`ToolRegistry`].
pub struct ProfileToolExecutor {
    registry: ToolRegistry,
}

impl ProfileToolExecutor {
    /// Creates an executor with both profile tools sharing one notifier
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let registry = ToolRegistry::new();

        let registered = [
            registry.register(RecordUserDetailsTool::new(Arc::clone(&notifier))),
            registry.register(RecordUnknownQuestionTool::new(notifier)),
        ];
        for result in registered {
            if let Err(error) = result {
                log::warn!("Skipping profile tool: {}", error);
            }
        }

        Self { registry }
    }
}

#[async_trait]
impl ToolExecutor for ProfileToolExecutor {
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool_name = call.function.name.as_str();

        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolError::NotFound(tool_name.to_string()))?;

        let args = parse_tool_args(&call.function.arguments)?;

        log::info!("Tool used: {}", tool_name);
        tool.execute(args).await
    }

    fn list_tools(&self) -> Vec<ToolSchema> {
        self.registry.list_tools()
    }
}
