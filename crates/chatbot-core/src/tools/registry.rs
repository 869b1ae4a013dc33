use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use thiserror::Error;

use crate::tools::{FunctionSchema, ToolError, ToolResult, ToolSchema};

/// Longest function name chat completion backends accept.
const MAX_TOOL_NAME_LEN: usize = 64;

/// A named side-effecting action the model may request.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Function declaration advertised to the model.
    fn to_schema(&self) -> ToolSchema {
        ToolSchema {
            schema_type: "function".to_string(),
            function: FunctionSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters_schema(),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("'{0}' is not a valid function name (1-64 of [A-Za-z0-9_-])")]
    InvalidName(String),
}

/// Explicit name to handler mapping, built once at startup and handed to
/// whoever dispatches model tool calls.
#[derive(Default)]
pub struct ToolRegistry {
    tools: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool under its own name. Names must be usable as function names
    /// on the wire and unique within the registry.
    pub fn register<T>(&self, tool: T) -> Result<(), RegistryError>
    where
        T: Tool + 'static,
    {
        let name = tool.name().to_string();
        if !is_valid_function_name(&name) {
            return Err(RegistryError::InvalidName(name));
        }

        match self.tools.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateTool(entry.key().clone())),
            Entry::Vacant(entry) => {
                log::debug!("Registered tool '{}'", entry.key());
                entry.insert(Arc::new(tool));
                Ok(())
            }
        }
    }

    /// Exact-name lookup; model output is not normalized.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Tool catalog sent with every model request, ordered by name so the
    /// request body is stable between rounds.
    pub fn list_tools(&self) -> Vec<ToolSchema> {
        let mut catalog: Vec<ToolSchema> = self
            .tools
            .iter()
            .map(|entry| entry.value().to_schema())
            .collect();
        catalog.sort_by(|a, b| a.function.name.cmp(&b.function.name));
        catalog
    }
}

fn is_valid_function_name(name: &str) -> bool {
    (1..=MAX_TOOL_NAME_LEN).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
