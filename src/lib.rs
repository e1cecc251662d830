pub mod chat;
pub mod error;
pub mod llm;
pub mod tracer;

pub use error::{HealthChatError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::chat::{take_turn, ChatMessage, ChatRole, Conversation};
    pub use crate::error::{HealthChatError, Result};
    pub use crate::llm::gateways::OpenAiGateway;
    pub use crate::llm::tools::{FunctionDescriptor, HealthInfoTool, LlmTool, ToolDescriptor};
    pub use crate::llm::{
        Agent, CompletionConfig, LlmGateway, LlmMessage, MessageRole, RunConfig, TurnRunner,
    };
    pub use crate::tracer::TurnTracer;
}
