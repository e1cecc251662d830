use crate::error::{HealthChatError, Result};
use crate::llm::tools::{FunctionDescriptor, LlmTool, ToolDescriptor};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

const BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const TIMEOUT_SECONDS: u64 = 10;

/// Tool for looking up a disease summary from the Wikipedia REST API.
///
/// Issues one GET against the `page/summary` endpoint per invocation and
/// normalizes every outcome to a plain string: the summary extract on success,
/// a "no information found" message when the service reports the topic as
/// missing, and an "Error: ..." message on transport or parse failure. The
/// fetch path never fails; the LLM sees a string either way and folds it into
/// its answer.
///
/// # Examples
///
/// ```ignore
/// use healthchat::llm::tools::health_info::HealthInfoTool;
/// use std::collections::HashMap;
///
/// let tool = HealthInfoTool::new();
/// let mut args = HashMap::new();
/// args.insert("disease".to_string(), serde_json::json!("diabetes"));
///
/// let summary = tool.run(&args).await?;
/// ```
#[derive(Clone)]
pub struct HealthInfoTool {
    client: reqwest::Client,
    base_url: String,
}

impl HealthInfoTool {
    /// Creates a new HealthInfoTool instance
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Creates a HealthInfoTool against a custom summary endpoint (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the summary for a topic, normalizing every failure to a string
    pub async fn fetch_summary(&self, disease: &str) -> String {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(disease));
        debug!(url = %url, "Fetching disease summary");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return format!("Error: {}", e),
        };

        if !response.status().is_success() {
            return format!("No information found for '{}'.", disease);
        }

        match response.json::<Value>().await {
            Ok(body) => body["extract"]
                .as_str()
                .unwrap_or("No summary found.")
                .to_string(),
            Err(e) => format!("Error: {}", e),
        }
    }
}

impl Default for HealthInfoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmTool for HealthInfoTool {
    async fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let disease = args.get("disease").and_then(|v| v.as_str()).ok_or_else(|| {
            HealthChatError::ToolError("missing required argument: disease".to_string())
        })?;

        Ok(json!(self.fetch_summary(disease).await))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: "get_health_info".to_string(),
                description: "Fetch a plain-language summary of a disease or medical topic from the encyclopedia. Use this to explain a named disease.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "disease": {
                            "type": "string",
                            "description": "The disease or medical topic name, in English"
                        }
                    },
                    "required": ["disease"]
                }),
            },
        }
    }
}
