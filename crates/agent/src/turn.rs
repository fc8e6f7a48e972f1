//! The turn loop: drive the model until it settles on a text reply.
//!
//! Each cycle submits the transcript (system prompt prepended at call
//! time) and appends the assistant reply. A reply without tool requests
//! ends the turn; otherwise every request is dispatched in order, each
//! answered by exactly one tool message, and the loop repeats.
//!
//! Failure asymmetry: a tool failure is folded into its result message
//! and the turn continues, but a model failure, a model timeout, or an
//! exhausted cycle budget aborts the whole turn with an error. Callers
//! run the loop on a working copy of the transcript, so an aborted turn
//! leaves the stored state untouched.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use adjutant_config::AppConfig;
use adjutant_core::error::{AgentError, Error, Result};
use adjutant_core::message::{Message, Transcript};
use adjutant_core::provider::{CompletionRequest, Provider};
use adjutant_core::tool::{ToolRegistry, ToolResult};

use crate::prompt;

/// Runs one user turn to completion against a transcript.
pub struct TurnRunner {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    system_prompt: String,
    max_iterations: u32,
    model_timeout: Duration,
    tool_timeout: Duration,
}

impl TurnRunner {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>, config: &AppConfig) -> Self {
        Self {
            provider,
            tools,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            system_prompt: prompt::system_prompt(&config.agent),
            max_iterations: config.agent.max_iterations,
            model_timeout: config.agent.model_timeout(),
            tool_timeout: config.agent.tool_timeout(),
        }
    }

    /// Run the loop until the model replies without tool requests.
    ///
    /// On success the transcript ends with the returned reply; on error
    /// the transcript is part-way through a turn and should be discarded
    /// by the caller.
    pub async fn run(&self, transcript: &mut Transcript) -> Result<String> {
        let tool_definitions = self.tools.definitions();

        for iteration in 1..=self.max_iterations {
            debug!(iteration, messages = transcript.len(), "turn cycle");

            // The system prompt exists only on the wire, never in the
            // stored transcript.
            let mut messages = Vec::with_capacity(transcript.len() + 1);
            messages.push(Message::system(&self.system_prompt));
            messages.extend(transcript.messages().iter().cloned());

            let request = CompletionRequest {
                model: self.model.clone(),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = match timeout(self.model_timeout, self.provider.complete(request)).await
            {
                Ok(completed) => completed.map_err(Error::Provider)?,
                Err(_) => {
                    warn!(
                        provider = self.provider.name(),
                        timeout_secs = self.model_timeout.as_secs(),
                        "model call timed out"
                    );
                    return Err(AgentError::ModelTimeout {
                        timeout_secs: self.model_timeout.as_secs(),
                    }
                    .into());
                }
            };

            if response.tool_requests.is_empty() {
                info!(iteration, "turn complete");
                let reply = response.content;
                transcript.push(Message::assistant(reply.clone()));
                return Ok(reply);
            }

            debug!(requests = response.tool_requests.len(), "dispatching tools");
            let requests = response.tool_requests;
            transcript.push(Message::assistant_with_requests(
                response.content,
                requests.clone(),
            ));

            // One tool message per request, in request order
            for request in &requests {
                let result = match timeout(self.tool_timeout, self.tools.dispatch(request)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(tool = %request.name, "tool invocation timed out");
                        ToolResult::err(format!(
                            "Tool '{}' timed out after {}s",
                            request.name,
                            self.tool_timeout.as_secs()
                        ))
                    }
                };
                transcript.push(Message::tool_result(&request.id, result));
            }
        }

        warn!(
            max_iterations = self.max_iterations,
            "turn aborted: model kept requesting tools"
        );
        Err(AgentError::IterationLimit {
            max_iterations: self.max_iterations,
        }
        .into())
    }
}
