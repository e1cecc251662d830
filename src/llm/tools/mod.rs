pub mod health_info;
mod tool;

pub use health_info::HealthInfoTool;
pub use tool::{FunctionDescriptor, LlmTool, ToolDescriptor};
