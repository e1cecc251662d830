//! Gateway for OpenAI-compatible chat-completions APIs.
//!
//! The default configuration points at the Gemini OpenAI-compatibility
//! endpoint, which is how this application reaches its hosted model, but any
//! service speaking the same wire format works.

use crate::error::{HealthChatError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, LlmToolCall, MessageRole};
use crate::llm::tools::LlmTool;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for connecting to an OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("HEALTHCHAT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: None,
        }
    }
}

/// Gateway for an OpenAI-compatible LLM service.
pub struct OpenAiGateway {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiGateway {
    /// Create a new gateway with configuration from the environment.
    pub fn new() -> Self {
        Self::with_config(OpenAiConfig::default())
    }

    /// Create a new gateway with custom configuration.
    pub fn with_config(config: OpenAiConfig) -> Self {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build().expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Create a gateway with a custom API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::with_config(OpenAiConfig {
            api_key: api_key.into(),
            ..Default::default()
        })
    }

    /// Create a gateway with a custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_config(OpenAiConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }
}

impl Default for OpenAiGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating completion to model backend");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let wire_messages = adapt_messages(messages);

        let mut body = serde_json::json!({
            "model": model,
            "messages": wire_messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        });

        if let Some(tools) = tools {
            let tool_defs: Vec<_> = tools.iter().map(|t| t.descriptor()).collect();
            body["tools"] = serde_json::to_value(tool_defs)?;
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HealthChatError::GatewayError(format!(
                "API error: {} - {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;

        let content = response_body["choices"][0]["message"]["content"].as_str().map(String::from);

        let tool_calls =
            if let Some(calls) = response_body["choices"][0]["message"]["tool_calls"].as_array() {
                convert_tool_calls(calls)
            } else {
                vec![]
            };

        Ok(LlmGatewayResponse {
            content,
            tool_calls,
        })
    }
}

/// Adapt messages to the OpenAI wire format.
fn adapt_messages(messages: &[LlmMessage]) -> Vec<Value> {
    messages
        .iter()
        .map(|msg| match msg.role {
            MessageRole::System => serde_json::json!({
                "role": "system",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::User => serde_json::json!({
                "role": "user",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::Assistant => {
                let mut assistant_msg = serde_json::json!({
                    "role": "assistant"
                });

                if let Some(ref content) = msg.content {
                    assistant_msg["content"] = serde_json::json!(content);
                }

                if let Some(ref tool_calls) = msg.tool_calls {
                    let formatted_calls: Vec<Value> = tool_calls
                        .iter()
                        .map(|tc| {
                            serde_json::json!({
                                "id": tc.id.as_deref().unwrap_or(""),
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": serde_json::to_string(&tc.arguments).unwrap_or_default()
                                }
                            })
                        })
                        .collect();
                    assistant_msg["tool_calls"] = serde_json::json!(formatted_calls);
                }

                assistant_msg
            }
            MessageRole::Tool => {
                // Tool messages need tool_call_id - use the first tool call id if available
                let tool_call_id = msg
                    .tool_calls
                    .as_ref()
                    .and_then(|tcs| tcs.first())
                    .and_then(|tc| tc.id.clone())
                    .unwrap_or_default();

                serde_json::json!({
                    "role": "tool",
                    "content": msg.content.as_deref().unwrap_or(""),
                    "tool_call_id": tool_call_id
                })
            }
        })
        .collect()
}

/// Convert tool calls from the OpenAI wire format to the internal format.
fn convert_tool_calls(tool_calls: &[Value]) -> Vec<LlmToolCall> {
    tool_calls
        .iter()
        .filter_map(|tc| {
            let id = tc["id"].as_str().map(String::from);
            let name = tc["function"]["name"].as_str()?.to_string();
            let args_str = tc["function"]["arguments"].as_str().unwrap_or("{}");

            let arguments: std::collections::HashMap<String, Value> =
                serde_json::from_str(args_str).unwrap_or_default();

            Some(LlmToolCall {
                id,
                name,
                arguments,
            })
        })
        .collect()
}
