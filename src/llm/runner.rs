use crate::error::Result;
use crate::llm::agent::Agent;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::LlmTool;
use crate::tracer::{TraceEvent, TurnTracer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Run configuration for a turn: completion parameters plus tracing.
///
/// The default carries a disabled tracer.
pub struct RunConfig {
    pub completion: CompletionConfig,
    pub tracer: Arc<TurnTracer>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            tracer: Arc::new(TurnTracer::disabled()),
        }
    }
}

/// The final answer produced by one turn
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub final_output: String,
    pub turn_id: Uuid,
}

/// Drives one user-message-to-final-answer cycle against the model backend.
///
/// A turn sends the agent's instructions, the user message, and the declared
/// tool schemas to the backend. If the backend answers with tool-call
/// requests, each named tool is executed with the backend-supplied arguments,
/// the calls and their results are folded back into the transcript, and one
/// follow-up completion (without tool schemas) produces the final text. At
/// most one round of tool invocation happens per turn.
///
/// Failures propagate to the caller; the runner suppresses nothing.
pub struct TurnRunner {
    model: String,
    gateway: Arc<dyn LlmGateway>,
}

impl TurnRunner {
    /// Create a new turn runner
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one turn for the given agent and user message
    pub async fn run(
        &self,
        agent: &Agent,
        user_message: &str,
        config: &RunConfig,
    ) -> Result<TurnResult> {
        let turn_id = Uuid::new_v4();
        let tid = turn_id.to_string();

        let mut messages = vec![
            LlmMessage::system(agent.instructions()),
            LlmMessage::user(user_message),
        ];

        let tools = agent.tools();
        let tools = if tools.is_empty() { None } else { Some(tools) };

        let response = self.complete_traced(&messages, tools, config, &tid).await?;

        if response.tool_calls.is_empty() {
            return Ok(TurnResult {
                final_output: response.content.unwrap_or_default(),
                turn_id,
            });
        }

        info!("Tool calls requested: {}", response.tool_calls.len());

        let mut any_executed = false;
        for tool_call in &response.tool_calls {
            if let Some(tool) = agent.find_tool(&tool_call.name) {
                info!("Executing tool: {}", tool_call.name);

                let started = Instant::now();
                let output = tool.run(&tool_call.arguments).await?;
                let output_str = serde_json::to_string(&output)?;

                config.tracer.record(TraceEvent::tool_call(
                    &tid,
                    &tool_call.name,
                    serde_json::to_value(&tool_call.arguments)?,
                    &output_str,
                    started.elapsed().as_secs_f64() * 1000.0,
                ));

                messages.push(LlmMessage::assistant_tool_calls(vec![tool_call.clone()]));
                messages.push(LlmMessage::tool_result(tool_call, output_str));
                any_executed = true;
            } else {
                warn!("Tool not found: {}", tool_call.name);
            }
        }

        if !any_executed {
            return Ok(TurnResult {
                final_output: response.content.unwrap_or_default(),
                turn_id,
            });
        }

        // Follow-up completion without tool schemas, so the backend answers in text
        let followup = self.complete_traced(&messages, None, config, &tid).await?;

        Ok(TurnResult {
            final_output: followup.content.unwrap_or_default(),
            turn_id,
        })
    }

    async fn complete_traced(
        &self,
        messages: &[LlmMessage],
        tools: Option<&[Box<dyn LlmTool>]>,
        config: &RunConfig,
        turn_id: &str,
    ) -> Result<LlmGatewayResponse> {
        let tool_names = tools
            .map(|ts| ts.iter().map(|t| t.descriptor().function.name).collect())
            .unwrap_or_default();

        config.tracer.record(TraceEvent::llm_call(
            turn_id,
            &self.model,
            messages.len(),
            tool_names,
        ));

        let started = Instant::now();
        let response =
            self.gateway.complete(&self.model, messages, tools, &config.completion).await?;

        config.tracer.record(TraceEvent::llm_response(
            turn_id,
            &self.model,
            response.content.as_deref().unwrap_or(""),
            response.tool_calls.len(),
            started.elapsed().as_secs_f64() * 1000.0,
        ));

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HealthChatError;
    use crate::llm::models::{LlmToolCall, MessageRole};
    use crate::llm::tools::{FunctionDescriptor, ToolDescriptor};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mock gateway that replays scripted responses and records what it was sent
    struct MockGateway {
        responses: Mutex<Vec<LlmGatewayResponse>>,
        calls: Mutex<Vec<(Vec<LlmMessage>, bool)>>,
    }

    impl MockGateway {
        fn new(responses: Vec<LlmGatewayResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, idx: usize) -> (Vec<LlmMessage>, bool) {
            self.calls.lock().unwrap()[idx].clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            _model: &str,
            messages: &[LlmMessage],
            tools: Option<&[Box<dyn LlmTool>]>,
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            self.calls.lock().unwrap().push((messages.to_vec(), tools.is_some()));

            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(LlmGatewayResponse {
                    content: Some("default response".to_string()),
                    tool_calls: vec![],
                })
            } else {
                Ok(responses.remove(0))
            }
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl LlmGateway for FailingGateway {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _tools: Option<&[Box<dyn LlmTool>]>,
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            Err(HealthChatError::GatewayError("API error: 401".to_string()))
        }
    }

    struct MockTool {
        name: String,
        result: Value,
    }

    #[async_trait]
    impl LlmTool for MockTool {
        async fn run(&self, _args: &HashMap<String, Value>) -> Result<Value> {
            Ok(self.result.clone())
        }

        fn descriptor(&self) -> ToolDescriptor {
            ToolDescriptor {
                r#type: "function".to_string(),
                function: FunctionDescriptor {
                    name: self.name.clone(),
                    description: "A mock tool".to_string(),
                    parameters: json!({}),
                },
            }
        }
    }

    fn lookup_call(name: &str) -> LlmToolCall {
        LlmToolCall {
            id: Some("call_1".to_string()),
            name: name.to_string(),
            arguments: HashMap::from([("disease".to_string(), json!("diabetes"))]),
        }
    }

    fn agent_with_tool() -> Agent {
        Agent::builder("Health Advisor")
            .instructions("You are a health advisor.")
            .tool(Box::new(MockTool {
                name: "get_health_info".to_string(),
                result: json!("Diabetes is a chronic metabolic disease."),
            }))
            .build()
    }

    #[tokio::test]
    async fn test_direct_answer_without_tool_call() {
        let gateway = Arc::new(MockGateway::new(vec![LlmGatewayResponse {
            content: Some("Hello! How can I help?".to_string()),
            tool_calls: vec![],
        }]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = agent_with_tool();

        let result = runner.run(&agent, "Hello", &RunConfig::default()).await.unwrap();

        assert_eq!(result.final_output, "Hello! How can I help?");
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sends_instructions_and_user_message() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = agent_with_tool();

        runner.run(&agent, "What is diabetes?", &RunConfig::default()).await.unwrap();

        let (messages, with_tools) = gateway.call(0);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, Some("You are a health advisor.".to_string()));
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].content, Some("What is diabetes?".to_string()));
        assert!(with_tools);
    }

    #[tokio::test]
    async fn test_tool_call_round_produces_final_answer() {
        let gateway = Arc::new(MockGateway::new(vec![
            LlmGatewayResponse {
                content: None,
                tool_calls: vec![lookup_call("get_health_info")],
            },
            LlmGatewayResponse {
                content: Some("In simple terms, diabetes is...".to_string()),
                tool_calls: vec![],
            },
        ]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = agent_with_tool();

        let result =
            runner.run(&agent, "What is diabetes?", &RunConfig::default()).await.unwrap();

        assert_eq!(result.final_output, "In simple terms, diabetes is...");
        assert_eq!(gateway.call_count(), 2);

        // Follow-up transcript carries the tool call and its result
        let (messages, with_tools) = gateway.call(1);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[2].tool_calls.as_ref().unwrap()[0].name, "get_health_info");
        assert_eq!(messages[3].role, MessageRole::Tool);
        assert!(messages[3].content.as_ref().unwrap().contains("chronic metabolic"));
        // Follow-up is issued without tool schemas
        assert!(!with_tools);
    }

    #[tokio::test]
    async fn test_unknown_tool_falls_back_to_first_response() {
        let gateway = Arc::new(MockGateway::new(vec![LlmGatewayResponse {
            content: Some("partial answer".to_string()),
            tool_calls: vec![lookup_call("unknown_tool")],
        }]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = agent_with_tool();

        let result = runner.run(&agent, "Hi", &RunConfig::default()).await.unwrap();

        assert_eq!(result.final_output, "partial answer");
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_exactly_one_tool_round() {
        // Backend asks for tools on every call; the runner must still terminate
        // after the follow-up completion.
        let gateway = Arc::new(MockGateway::new(vec![
            LlmGatewayResponse {
                content: None,
                tool_calls: vec![lookup_call("get_health_info")],
            },
            LlmGatewayResponse {
                content: Some("final text".to_string()),
                tool_calls: vec![lookup_call("get_health_info")],
            },
        ]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = agent_with_tool();

        let result = runner.run(&agent, "Hi", &RunConfig::default()).await.unwrap();

        assert_eq!(result.final_output, "final text");
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let runner = TurnRunner::new("test-model", Arc::new(FailingGateway));
        let agent = agent_with_tool();

        let result = runner.run(&agent, "Hi", &RunConfig::default()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_agent_without_tools_sends_no_schemas() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let runner = TurnRunner::new("test-model", gateway.clone());
        let agent = Agent::builder("Plain").build();

        runner.run(&agent, "Hi", &RunConfig::default()).await.unwrap();

        let (_, with_tools) = gateway.call(0);
        assert!(!with_tools);
    }

    #[tokio::test]
    async fn test_tracer_records_turn_events() {
        let gateway = Arc::new(MockGateway::new(vec![
            LlmGatewayResponse {
                content: None,
                tool_calls: vec![lookup_call("get_health_info")],
            },
            LlmGatewayResponse {
                content: Some("final".to_string()),
                tool_calls: vec![],
            },
        ]));
        let runner = TurnRunner::new("test-model", gateway);
        let agent = agent_with_tool();

        let tracer = Arc::new(TurnTracer::enabled());
        let config = RunConfig {
            completion: CompletionConfig::default(),
            tracer: tracer.clone(),
        };

        let result = runner.run(&agent, "What is diabetes?", &config).await.unwrap();

        let events = tracer.events();
        // llm call, llm response, tool call, llm call, llm response
        assert_eq!(events.len(), 5);
        // All events share the turn's correlation id
        let tid = result.turn_id.to_string();
        assert!(events.iter().all(|e| e.turn_id() == tid));
    }

    #[tokio::test]
    async fn test_turn_ids_are_unique_per_run() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let runner = TurnRunner::new("test-model", gateway);
        let agent = Agent::builder("Plain").build();

        let first = runner.run(&agent, "one", &RunConfig::default()).await.unwrap();
        let second = runner.run(&agent, "two", &RunConfig::default()).await.unwrap();

        assert_ne!(first.turn_id, second.turn_id);
    }
}
