pub mod conversation;
mod turn;

pub use conversation::{ChatMessage, ChatRole, Conversation};
pub use turn::take_turn;
