pub mod agent;
pub mod gateway;
pub mod gateways;
pub mod models;
pub mod runner;
pub mod tools;

pub use agent::{Agent, AgentBuilder};
pub use gateway::{CompletionConfig, LlmGateway};
pub use models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole};
pub use runner::{RunConfig, TurnResult, TurnRunner};
pub use tools::{FunctionDescriptor, LlmTool, ToolDescriptor};
