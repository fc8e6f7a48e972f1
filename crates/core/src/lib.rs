//! # Adjutant Core
//!
//! Domain types, traits, and error definitions for the adjutant
//! assistant. This crate defines the model the rest of the workspace
//! implements against: the transcript data model, the tool and provider
//! contracts, and the session store.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here ([`Provider`], [`Tool`],
//! [`SessionStore`]). Implementations live in their respective crates,
//! which keeps the dependency graph pointing inward and makes the agent
//! loop testable with scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, Error, ProviderError, Result, ToolError};
pub use message::{Message, Role, ToolRequest, Transcript};
pub use provider::{CompletionRequest, CompletionResponse, Provider, ToolDefinition, Usage};
pub use session::{InMemorySessionStore, SessionStore};
pub use tool::{Tool, ToolRegistry, ToolResult, parse_args};
