//! Error types for the adjutant domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; `Error` aggregates the
//! ones that can abort a chat turn.

use thiserror::Error;

/// The top-level error type for a chat turn.
///
/// Tool failures are deliberately absent: the dispatch boundary folds
/// every tool-side failure into a `ToolResult` with `success == false`
/// (see [`crate::tool::ToolRegistry::dispatch`]), so only model-side and
/// loop-side failures can abort a turn.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Agent loop errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Failures inside a single tool invocation.
///
/// None of these propagate past the registry: dispatch converts them into
/// failure results the model reads on its next turn.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    // Displays as the bare message; tools rely on the exact wording
    // reaching the model (e.g. "GITHUB_TOKEN is not set.").
    #[error("{0}")]
    NotConfigured(String),

    #[error("{message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Model call timed out after {timeout_secs}s")]
    ModelTimeout { timeout_secs: u64 },

    #[error("No final reply after {max_iterations} tool cycles")]
    IterationLimit { max_iterations: u32 },

    #[error("Session '{0}' is already processing a turn")]
    SessionBusy(String),
}
