//! Provider trait — the abstraction over the language-model backend.
//!
//! A Provider submits an ordered transcript (system prompt first) plus
//! the registry's tool definitions and returns exactly one assistant
//! reply, which may request tool invocations. The agent loop treats it
//! as an opaque decision oracle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::{Message, ToolRequest};

/// One completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "gpt-4o-mini")
    pub model: String,

    /// The messages to send, system prompt included
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Tools the model may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// Exactly one assistant reply.
///
/// Split into fields rather than a [`Message`] so the loop constructs
/// the assistant transcript entry itself — a provider cannot hand back
/// a user or tool entry by mistake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Reply text (may be empty when the reply only carries requests)
    pub content: String,

    /// Tool invocations the model requests
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_requests: Vec<ToolRequest>,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The agent loop calls `complete()` without knowing which backend is
/// answering. Failures here are fatal to the turn (unlike tool failures,
/// which are fed back to the model).
#[async_trait]
pub trait Provider: Send + Sync {
    /// A short name for logs (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get exactly one assistant reply.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_defaults() {
        let req = CompletionRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: default_temperature(),
            max_tokens: None,
            tools: vec![],
        };
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "create_notion_task".into(),
            description: "Create a task in the Notion database".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "The task title" }
                },
                "required": ["title"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("create_notion_task"));
        assert!(json.contains("title"));
    }

    #[test]
    fn empty_tool_requests_round_trip() {
        let response = CompletionResponse {
            content: "Hi there!".into(),
            tool_requests: vec![],
            model: "gpt-4o-mini".into(),
            usage: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("tool_requests"));

        let back: CompletionResponse = serde_json::from_str(&json).unwrap();
        assert!(back.tool_requests.is_empty());
    }
}
