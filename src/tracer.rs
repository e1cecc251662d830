//! Turn-level tracing for observability and debugging.
//!
//! The tracer records what happened inside a turn: the call made to the model
//! backend, the response that came back, and any tool executions in between.
//! Events carry unix timestamps and the turn's correlation id, so everything
//! belonging to one user message can be read back together.
//!
//! Tracing is disabled by default; a disabled tracer is a no-op.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Mutex;

/// Current time as unix seconds
pub fn now_unix() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 100;
    if text.chars().count() > MAX_CHARS {
        let truncated: String = text.chars().take(MAX_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn format_time(timestamp: f64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap())
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string()
}

/// A single recorded interaction inside a turn
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The model backend was called
    LlmCall {
        timestamp: f64,
        turn_id: String,
        model: String,
        message_count: usize,
        tool_names: Vec<String>,
    },
    /// The model backend responded
    LlmResponse {
        timestamp: f64,
        turn_id: String,
        model: String,
        content_preview: String,
        tool_call_count: usize,
        duration_ms: f64,
    },
    /// A tool was executed with backend-supplied arguments
    ToolCall {
        timestamp: f64,
        turn_id: String,
        name: String,
        arguments: serde_json::Value,
        result_preview: String,
        duration_ms: f64,
    },
}

impl TraceEvent {
    pub fn llm_call(
        turn_id: &str,
        model: &str,
        message_count: usize,
        tool_names: Vec<String>,
    ) -> Self {
        Self::LlmCall {
            timestamp: now_unix(),
            turn_id: turn_id.to_string(),
            model: model.to_string(),
            message_count,
            tool_names,
        }
    }

    pub fn llm_response(
        turn_id: &str,
        model: &str,
        content: &str,
        tool_call_count: usize,
        duration_ms: f64,
    ) -> Self {
        Self::LlmResponse {
            timestamp: now_unix(),
            turn_id: turn_id.to_string(),
            model: model.to_string(),
            content_preview: preview(content),
            tool_call_count,
            duration_ms,
        }
    }

    pub fn tool_call(
        turn_id: &str,
        name: &str,
        arguments: serde_json::Value,
        result: &str,
        duration_ms: f64,
    ) -> Self {
        Self::ToolCall {
            timestamp: now_unix(),
            turn_id: turn_id.to_string(),
            name: name.to_string(),
            arguments,
            result_preview: preview(result),
            duration_ms,
        }
    }

    /// The turn this event belongs to
    pub fn turn_id(&self) -> &str {
        match self {
            Self::LlmCall { turn_id, .. }
            | Self::LlmResponse { turn_id, .. }
            | Self::ToolCall { turn_id, .. } => turn_id,
        }
    }

    pub fn timestamp(&self) -> f64 {
        match self {
            Self::LlmCall { timestamp, .. }
            | Self::LlmResponse { timestamp, .. }
            | Self::ToolCall { timestamp, .. } => *timestamp,
        }
    }

    /// A one-line human-readable summary of the event
    pub fn printable_summary(&self) -> String {
        match self {
            Self::LlmCall {
                timestamp,
                turn_id,
                model,
                message_count,
                tool_names,
            } => {
                let tools = if tool_names.is_empty() {
                    "none".to_string()
                } else {
                    tool_names.join(", ")
                };
                format!(
                    "[{}] llm call (turn {}) model={} messages={} tools={}",
                    format_time(*timestamp),
                    turn_id,
                    model,
                    message_count,
                    tools
                )
            }
            Self::LlmResponse {
                timestamp,
                turn_id,
                model,
                content_preview,
                tool_call_count,
                duration_ms,
            } => format!(
                "[{}] llm response (turn {}) model={} tool_calls={} duration={:.0}ms content={}",
                format_time(*timestamp),
                turn_id,
                model,
                tool_call_count,
                duration_ms,
                content_preview
            ),
            Self::ToolCall {
                timestamp,
                turn_id,
                name,
                result_preview,
                duration_ms,
                ..
            } => format!(
                "[{}] tool call (turn {}) name={} duration={:.0}ms result={}",
                format_time(*timestamp),
                turn_id,
                name,
                duration_ms,
                result_preview
            ),
        }
    }
}

/// Stores trace events for the turns run against it.
///
/// A disabled tracer records nothing; `record` is safe to call either way, so
/// callers never branch on the flag.
pub struct TurnTracer {
    enabled: bool,
    events: Mutex<Vec<TraceEvent>>,
}

impl TurnTracer {
    /// Create a tracer that records events
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Create a tracer that discards everything
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an event; no-op when disabled
    pub fn record(&self, event: TraceEvent) {
        if !self.enabled {
            return;
        }
        let mut events = self.events.lock().unwrap();
        events.push(event);
    }

    /// All recorded events, in record order
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Printable summaries of all recorded events
    pub fn summaries(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|e| e.printable_summary()).collect()
    }
}

impl Default for TurnTracer {
    fn default() -> Self {
        Self::disabled()
    }
}
