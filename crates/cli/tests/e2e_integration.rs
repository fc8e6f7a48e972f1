//! End-to-end integration tests for the Adjutant assistant.
//!
//! These tests exercise the full pipeline from inbound message to final
//! reply: session bookkeeping, the model/tool loop, dispatch through the
//! real tool registry, and the HTTP surface.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use adjutant_agent::{ChatService, TurnRunner};
use adjutant_config::AppConfig;
use adjutant_core::error::ProviderError;
use adjutant_core::message::{Message, Role, ToolRequest};
use adjutant_core::provider::{CompletionRequest, CompletionResponse, Provider};
use adjutant_core::session::{InMemorySessionStore, SessionStore};
use adjutant_tools::default_registry;

// ── Mock provider ────────────────────────────────────────────────────────

/// Replays scripted completions in sequence, recording what it was sent.
struct ScriptedProvider {
    responses: Mutex<VecDeque<CompletionResponse>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<CompletionResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn text(content: &str) -> CompletionResponse {
        CompletionResponse {
            content: content.into(),
            tool_requests: vec![],
            model: "e2e-mock".into(),
            usage: None,
        }
    }

    fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            content: String::new(),
            tool_requests: vec![ToolRequest::new(id, name, arguments)],
            model: "e2e-mock".into(),
            usage: None,
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e-mock"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.seen.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedProvider exhausted");
        Ok(response)
    }
}

/// A chat service wired exactly as the gateway wires it, over the full
/// default tool registry and an empty session store.
fn service_with(provider: Arc<ScriptedProvider>) -> (Arc<ChatService>, Arc<InMemorySessionStore>) {
    let config = AppConfig::default();
    let store = Arc::new(InMemorySessionStore::new());
    let tools = Arc::new(default_registry(&config));
    let runner = TurnRunner::new(provider, tools, &config);
    (Arc::new(ChatService::new(store.clone(), runner)), store)
}

// ── E2E: chat turns through the service ──────────────────────────────────

#[tokio::test]
async fn e2e_direct_answer_round_trip() {
    // Scenario: a plain greeting, answered without any tool use.
    let provider = ScriptedProvider::new(vec![ScriptedProvider::text(
        "Hello! I can manage your Notion tasks and GitHub repos.",
    )]);
    let (service, store) = service_with(provider.clone());

    let reply = service
        .handle_message("e2e-hello", "Hi there!")
        .await
        .expect("turn should succeed");

    assert_eq!(reply, "Hello! I can manage your Notion tasks and GitHub repos.");
    assert_eq!(provider.calls(), 1);

    let stored = store.get("e2e-hello").await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.final_reply(), Some(reply.as_str()));
}

#[tokio::test]
async fn e2e_tool_cycle_with_missing_credentials() {
    // Scenario: the model asks for github_whoami but no GITHUB_TOKEN is
    // configured. The failure comes back as a tool result, the model gets
    // a second cycle to explain, and the turn completes normally.
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::tool_call("call_who", "github_whoami", serde_json::json!({})),
        ScriptedProvider::text("I can't reach GitHub — no token is configured."),
    ]);
    let (service, store) = service_with(provider.clone());

    let reply = service
        .handle_message("e2e-gh", "who am I on GitHub?")
        .await
        .expect("turn should survive the tool failure");

    assert!(reply.contains("no token"));
    assert_eq!(provider.calls(), 2);

    // user, assistant(request), tool, assistant
    let stored = store.get("e2e-gh").await;
    assert_eq!(stored.len(), 4);
    match &stored.messages()[2] {
        Message::Tool {
            tool_call_id,
            result,
        } => {
            assert_eq!(tool_call_id, "call_who");
            assert!(!result.success);
            assert!(result.error_message().unwrap().contains("GITHUB_TOKEN"));
        }
        other => panic!("expected tool message, got {other:?}"),
    }
    assert!(stored.unanswered_tool_calls().is_empty());
}

#[tokio::test]
async fn e2e_follow_up_turn_sees_the_earlier_exchange() {
    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("Nice to meet you, Ada."),
        ScriptedProvider::text("Your name is Ada."),
    ]);
    let (service, store) = service_with(provider.clone());

    service
        .handle_message("e2e-memory", "My name is Ada.")
        .await
        .expect("first turn should succeed");
    let reply = service
        .handle_message("e2e-memory", "What's my name?")
        .await
        .expect("second turn should succeed");

    assert_eq!(reply, "Your name is Ada.");

    // The second completion carried the whole history: system prompt,
    // first exchange, then the new question.
    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen[1].messages.len(), 4);
    assert_eq!(seen[1].messages[0].role(), Role::System);
    assert_eq!(seen[1].messages[1].content(), "My name is Ada.");

    assert_eq!(store.get("e2e-memory").await.len(), 4);
}

// ── E2E: gateway HTTP surface ────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_chat_over_http() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let provider = ScriptedProvider::new(vec![
        ScriptedProvider::text("First reply."),
        ScriptedProvider::text("Second reply."),
    ]);
    let config = AppConfig::default();
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let tools = Arc::new(default_registry(&config));
    let runner = TurnRunner::new(provider, tools.clone(), &config);
    let service = Arc::new(ChatService::new(store, runner));
    let app = adjutant_gateway::build_router(Arc::new(adjutant_gateway::GatewayState {
        service,
        tools,
    }));

    let health = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    // Two chats on one session: the gateway keeps the conversation going.
    for expected in ["First reply.", "Second reply."] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"session_id": "e2e-http", "message": "hello"}).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["reply"], expected);
        assert_eq!(body["session_id"], "e2e-http");
    }
}

// ── E2E: tool registry coverage ──────────────────────────────────────────

#[tokio::test]
async fn e2e_default_registry_covers_every_tool() {
    let registry = default_registry(&AppConfig::default());
    assert_eq!(registry.len(), 26);

    let expected = [
        "show_notion_tasks",
        "create_notion_task",
        "update_notion_task",
        "delete_notion_task",
        "github_whoami",
        "github_create_repo",
        "github_list_commits",
        "github_create_file",
        "github_merge_pr",
        "github_search_repositories",
        "github_rate_limit",
    ];
    for name in expected {
        assert!(
            registry.get(name).is_some(),
            "tool '{name}' should be registered"
        );
    }

    // Every definition ships an object schema the model can use.
    for def in registry.definitions() {
        assert_eq!(def.parameters["type"], "object", "{} schema", def.name);
        assert!(!def.description.is_empty());
    }
}

#[tokio::test]
async fn e2e_unconfigured_tools_fail_politely() {
    // No credentials anywhere: dispatch must produce failure results the
    // model can relay, never an error that aborts the turn.
    let registry = default_registry(&AppConfig::default());

    let result = registry
        .dispatch(&ToolRequest::new(
            "tc1",
            "show_notion_tasks",
            serde_json::json!({}),
        ))
        .await;
    assert!(!result.success);
    assert!(result.error_message().unwrap().contains("NOTION_TOKEN"));

    let result = registry
        .dispatch(&ToolRequest::new(
            "tc2",
            "github_list_repos",
            serde_json::json!({}),
        ))
        .await;
    assert!(!result.success);
    assert!(result.error_message().unwrap().contains("GITHUB_TOKEN"));
}

// ── E2E: configuration system ────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_defaults_and_toml_round_trip() {
    let config = AppConfig::default();

    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert!(config.llm.api_key.is_none());
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8000);
    assert_eq!(config.agent.max_iterations, 10);

    let rendered = toml::to_string_pretty(&config).expect("config should serialize");
    let reparsed: AppConfig = toml::from_str(&rendered).expect("config should parse back");

    assert_eq!(reparsed.llm.model, config.llm.model);
    assert_eq!(reparsed.gateway.port, config.gateway.port);
    assert_eq!(reparsed.agent.max_iterations, config.agent.max_iterations);
}
