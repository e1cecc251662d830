//! One presentation-loop iteration, minus the terminal I/O.
//!
//! `take_turn` is the piece of the loop that owns the store: it appends the
//! user message, drives the runner, and appends the answer. Failures become a
//! fixed user-visible error string recorded in history like any other
//! assistant message, so the session stays usable.

use crate::chat::conversation::{ChatMessage, Conversation};
use crate::llm::agent::Agent;
use crate::llm::runner::{RunConfig, TurnRunner};
use tracing::error;

/// Process one user submission and return the text to render.
///
/// Grows the conversation by exactly two messages: the user's, then either
/// the backend's answer or the error string standing in for it.
pub async fn take_turn(
    conversation: &mut Conversation,
    runner: &TurnRunner,
    agent: &Agent,
    config: &RunConfig,
    input: &str,
) -> String {
    conversation.append(ChatMessage::user(input));

    let reply = match runner.run(agent, input, config).await {
        Ok(result) => result.final_output,
        Err(e) => {
            error!("Turn failed: {}", e);
            format!("Error generating response: {}", e)
        }
    };

    conversation.append(ChatMessage::assistant(&reply));
    reply
}
