use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Descriptor for a callable tool, in the function-calling shape the backend expects
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Trait for tools the LLM may invoke mid-reasoning.
///
/// The backend decides whether and when to call a tool based on its declared
/// descriptor; this crate never branches on tool choice itself.
#[async_trait]
pub trait LlmTool: Send + Sync {
    /// Execute the tool with backend-supplied arguments
    async fn run(&self, args: &HashMap<String, Value>) -> Result<Value>;

    /// Get the tool descriptor declared to the LLM
    fn descriptor(&self) -> ToolDescriptor;

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.descriptor().function.name == name
    }
}
