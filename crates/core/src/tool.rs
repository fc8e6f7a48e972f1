//! Tool trait and registry — the fixed set of remote actions the model
//! can request.
//!
//! The registry is the failure boundary: unknown tool names, argument
//! validation failures, missing credentials, and remote errors are all
//! folded into a [`ToolResult`] with `success == false`. Dispatch never
//! fails, so a bad tool call can never abort a turn — the model sees the
//! failure on its next cycle and reacts.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::message::ToolRequest;
use crate::provider::ToolDefinition;

/// The structured payload a tool execution returns.
///
/// Serializes flat — `{"success": true, ...payload}` — which is exactly
/// the shape fed back to the model in a tool message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the invocation succeeded
    pub success: bool,

    /// Result fields on success; `error` (and optionally `status_code`)
    /// on failure
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl ToolResult {
    /// A success result. Object payloads merge flat; any other value
    /// lands under a `"result"` key.
    pub fn ok(payload: serde_json::Value) -> Self {
        let payload = match payload {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Self {
            success: true,
            payload,
        }
    }

    /// A failure result with an error description.
    pub fn err(message: impl Into<String>) -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert(
            "error".to_string(),
            serde_json::Value::String(message.into()),
        );
        Self {
            success: false,
            payload,
        }
    }

    /// A failure result carrying the remote HTTP status, mirroring what
    /// the backends return on 4xx/5xx.
    pub fn err_with_status(status_code: u16, message: impl Into<String>) -> Self {
        let mut result = Self::err(message);
        result
            .payload
            .insert("status_code".to_string(), status_code.into());
        result
    }

    /// The error description, if this is a failure result.
    pub fn error_message(&self) -> Option<&str> {
        self.payload.get("error").and_then(|v| v.as_str())
    }

    /// Serialized form for the provider wire (tool message content).
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"error":"unserializable tool result"}"#.to_string()
        })
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Api {
                status_code,
                message,
            } => Self::err_with_status(status_code, message),
            other => Self::err(other.to_string()),
        }
    }
}

/// Deserialize an argument mapping into a tool's typed argument struct.
///
/// Schema mismatches (missing required field, wrong type) surface as
/// `ToolError::InvalidArguments` and become failure results at dispatch.
pub fn parse_args<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> std::result::Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// The core Tool trait.
///
/// Each remote action (Notion task queries, GitHub repo management, etc.)
/// implements this trait and is registered in the ToolRegistry, which
/// makes it available to the agent loop and to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "create_notion_task").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The agent loop uses this to:
/// 1. Enumerate tool definitions to send to the model
/// 2. Dispatch tool requests the model makes
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch one tool request. Never fails: every failure mode comes
    /// back as a `ToolResult` with `success == false`.
    pub async fn dispatch(&self, request: &ToolRequest) -> ToolResult {
        let Some(tool) = self.tools.get(&request.name) else {
            warn!(tool = %request.name, "unknown tool requested");
            return ToolResult::from(ToolError::NotFound(request.name.clone()));
        };
        match tool.execute(request.arguments.clone()).await {
            Ok(result) => result,
            Err(e) => {
                debug!(tool = %request.name, error = %e, "tool execution failed");
                ToolResult::from(e)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
