pub mod agent;
pub mod persona;
pub mod tools;

pub use agent::types::{Message, Role};
pub use persona::{build_system_prompt, load_persona, PersonaContext, ProfileError};
pub use tools::{
    parse_tool_args, FunctionCall, FunctionSchema, Tool, ToolCall, ToolError, ToolExecutor,
    ToolRegistry, ToolResult, ToolSchema,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
