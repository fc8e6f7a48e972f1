//! Message and Transcript domain types.
//!
//! A transcript is the append-only message history for one chat session.
//! Messages are discriminated by role so the agent loop branches
//! exhaustively: a plain reply, a reply carrying tool requests, and a
//! tool result are distinct variants, not optional fields on one struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tool::ToolResult;

/// The role of a transcript entry. Matches the wire-level role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Model instructions (injected at call time, never persisted)
    System,
    /// The end user
    User,
    /// The model's reply
    Assistant,
    /// Tool execution result
    Tool,
}

/// A tool invocation requested by the assistant, tagged with a call id
/// so the matching result can be linked back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Correlation id (the provider's tool_call id)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Argument mapping, as parsed JSON
    pub arguments: serde_json::Value,
}

impl ToolRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A single transcript entry.
///
/// Invariant: an `Assistant` entry with N tool requests is followed by
/// exactly N `Tool` entries (one per request, linked by call id) before
/// the next `Assistant` entry. The agent loop maintains this by
/// construction; [`Transcript::unanswered_tool_calls`] checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Model instructions.
    System { content: String },

    /// One inbound user turn.
    User { content: String },

    /// A model reply: text plus zero or more tool requests.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_requests: Vec<ToolRequest>,
    },

    /// The outcome of one tool request.
    Tool {
        tool_call_id: String,
        result: ToolResult,
    },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create an assistant message with no tool requests.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_requests: Vec::new(),
        }
    }

    /// Create an assistant message carrying tool requests.
    pub fn assistant_with_requests(
        content: impl Into<String>,
        tool_requests: Vec<ToolRequest>,
    ) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_requests,
        }
    }

    /// Create a tool result message linked to its originating request.
    pub fn tool_result(tool_call_id: impl Into<String>, result: ToolResult) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            result,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// Text content. Empty for tool results, whose payload lives in
    /// [`ToolResult`].
    pub fn content(&self) -> &str {
        match self {
            Self::System { content } | Self::User { content } | Self::Assistant { content, .. } => {
                content
            }
            Self::Tool { .. } => "",
        }
    }

    /// Tool requests carried by this message (empty unless assistant).
    pub fn tool_requests(&self) -> &[ToolRequest] {
        match self {
            Self::Assistant { tool_requests, .. } => tool_requests,
            _ => &[],
        }
    }
}

/// The ordered message history for one session.
///
/// Append-only: entries are immutable once pushed, so the field is
/// private and the only mutator is [`Transcript::push`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,

    /// When this transcript was created
    created_at: DateTime<Utc>,

    /// When the last message was appended
    updated_at: DateTime<Utc>,
}

impl Transcript {
    /// Create a new empty transcript.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Call ids from the most recent assistant message that have no
    /// matching tool message yet. Empty when every request is answered.
    pub fn unanswered_tool_calls(&self) -> Vec<&str> {
        let mut answered = std::collections::HashSet::new();
        for message in self.messages.iter().rev() {
            match message {
                Message::Tool { tool_call_id, .. } => {
                    answered.insert(tool_call_id.as_str());
                }
                Message::Assistant { tool_requests, .. } => {
                    return tool_requests
                        .iter()
                        .map(|r| r.id.as_str())
                        .filter(|id| !answered.contains(id))
                        .collect();
                }
                // A user or system entry before any assistant one means
                // no request is pending.
                _ => return Vec::new(),
            }
        }
        Vec::new()
    }

    /// The final reply text, if the transcript ends on an assistant
    /// message with no tool requests.
    pub fn final_reply(&self) -> Option<&str> {
        match self.messages.last() {
            Some(Message::Assistant {
                content,
                tool_requests,
            }) if tool_requests.is_empty() => Some(content),
            _ => None,
        }
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
