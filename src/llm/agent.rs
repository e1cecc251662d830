//! Agent definition: a named, immutable bundle of instructions and tools.

use crate::llm::tools::LlmTool;

/// A static declaration binding an instruction prompt and the set of callable
/// tools the model may invoke.
///
/// Constructed once at startup and shared read-only across all turns. The
/// agent never decides whether a tool should be called; it only declares what
/// is callable, and the backend's own reasoning does the rest.
pub struct Agent {
    name: String,
    instructions: String,
    tools: Vec<Box<dyn LlmTool>>,
}

impl Agent {
    /// Create an agent builder
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &[Box<dyn LlmTool>] {
        &self.tools
    }

    /// Find the registered tool matching a backend-requested name
    pub fn find_tool(&self, name: &str) -> Option<&dyn LlmTool> {
        self.tools.iter().find(|t| t.matches(name)).map(|t| t.as_ref())
    }
}

/// Builder for constructing an [`Agent`].
pub struct AgentBuilder {
    name: String,
    instructions: String,
    tools: Vec<Box<dyn LlmTool>>,
}

impl AgentBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: "You are a helpful assistant.".to_string(),
            tools: Vec::new(),
        }
    }

    /// Set the system instruction text
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Register a callable tool
    pub fn tool(mut self, tool: Box<dyn LlmTool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn build(self) -> Agent {
        Agent {
            name: self.name,
            instructions: self.instructions,
            tools: self.tools,
        }
    }
}
