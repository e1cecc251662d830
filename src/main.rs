//! HealthChat CLI: a health-advisor chat session in the terminal.
//!
//! Reads one message per line. `/clear` empties the conversation history;
//! an empty line exits.

use anyhow::Context;
use healthchat::chat::{take_turn, ChatRole, Conversation};
use healthchat::llm::gateways::OpenAiGateway;
use healthchat::llm::tools::HealthInfoTool;
use healthchat::llm::{Agent, RunConfig, TurnRunner};
use std::io::{self, Write};
use std::sync::Arc;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const INSTRUCTIONS: &str = "You are a health advisor. Use the get_health_info tool to explain \
any disease in simple terms. If the user names a disease in another language, translate the \
name to English before looking it up. Answer general questions from your own knowledge \
without the tool.";

fn render_history(conversation: &Conversation) {
    for message in conversation.messages() {
        let speaker = match message.role {
            ChatRole::User => "You",
            ChatRole::Assistant => "Assistant",
        };
        println!("{}: {}\n", speaker, message.content);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let model = std::env::var("HEALTHCHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let gateway = Arc::new(OpenAiGateway::new());
    let runner = TurnRunner::new(model, gateway);

    let agent = Agent::builder("Health Advisor")
        .instructions(INSTRUCTIONS)
        .tool(Box::new(HealthInfoTool::new()))
        .build();

    let config = RunConfig::default();
    let mut conversation = Conversation::new();

    println!("HealthCare Chatbot");
    println!("==================");
    println!("Ask any medical question and get a response.");
    println!("Type /clear to clear the history. Send an empty message to exit.\n");

    render_history(&conversation);

    loop {
        print!("You: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).context("failed to read input")?;
        let input = input.trim();

        if input.is_empty() {
            println!("\nGoodbye!");
            break;
        }

        if input == "/clear" {
            conversation.clear();
            println!("History cleared.\n");
            render_history(&conversation);
            continue;
        }

        let reply = take_turn(&mut conversation, &runner, &agent, &config, input).await;
        println!("Assistant: {}\n", reply);
    }

    Ok(())
}
