//! HTTP gateway for Adjutant.
//!
//! Exposes the chat surface over REST: a health check, the chat
//! endpoint, and tool discovery. The gateway owns no conversation
//! logic; it translates HTTP into [`ChatService::handle_message`]
//! calls and turn errors into status codes. Raw provider errors stay
//! in the logs, never in a response body.
//!
//! Built on Axum.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use adjutant_agent::{ChatService, TurnRunner};
use adjutant_config::AppConfig;
use adjutant_core::error::{AgentError, Error};
use adjutant_core::provider::Provider;
use adjutant_core::session::{InMemorySessionStore, SessionStore};
use adjutant_core::tool::ToolRegistry;
use adjutant_providers::OpenAiProvider;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: Arc<ChatService>,
    pub tools: Arc<ToolRegistry>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/tools", get(tools_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the provider, tool registry, and chat service once, then
/// serves until the process is stopped.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider: Arc<dyn Provider> = Arc::new(OpenAiProvider::from_config(&config.llm)?);
    let tools = Arc::new(adjutant_tools::default_registry(&config));
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let runner = TurnRunner::new(provider, tools.clone(), &config);
    let service = Arc::new(ChatService::new(store, runner));

    info!(addr = %addr, tools = tools.len(), "Gateway starting");
    let app = build_router(Arc::new(GatewayState { service, tools }));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    session_id: String,
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    session_id: String,
    reply: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(session_id = %payload.session_id, "chat request");

    let reply = state
        .service
        .handle_message(&payload.session_id, &payload.message)
        .await
        .map_err(turn_error_response)?;

    Ok(Json(ChatResponse {
        session_id: payload.session_id,
        reply,
    }))
}

fn turn_error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    match &err {
        Error::Agent(AgentError::SessionBusy(session_id)) => {
            info!(session_id = %session_id, "rejected concurrent message");
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "A reply for this session is still being prepared. Please wait for it."
                        .into(),
                }),
            )
        }
        _ => {
            error!(error = %err, "turn failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Sorry, something went wrong while preparing a reply. Please try again."
                        .into(),
                }),
            )
        }
    }
}

#[derive(Serialize)]
struct ToolDto {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolDto>,
    count: usize,
}

async fn tools_handler(State(state): State<SharedState>) -> Json<ToolListResponse> {
    let defs = state.tools.definitions();
    let count = defs.len();

    Json(ToolListResponse {
        tools: defs
            .into_iter()
            .map(|d| ToolDto {
                name: d.name,
                description: d.description,
                parameters: d.parameters,
            })
            .collect(),
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use adjutant_core::error::ProviderError;
    use adjutant_core::provider::{CompletionRequest, CompletionResponse};

    struct FixedProvider;

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: "You have 3 open tasks.".into(),
                tool_requests: vec![],
                model: "mock".into(),
                usage: None,
            })
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    fn test_state(provider: Arc<dyn Provider>) -> SharedState {
        let config = AppConfig::default();
        let tools = Arc::new(adjutant_tools::default_registry(&config));
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let runner = TurnRunner::new(provider, tools.clone(), &config);
        Arc::new(GatewayState {
            service: Arc::new(ChatService::new(store, runner)),
            tools,
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(Arc::new(FixedProvider)));

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn chat_round_trip() {
        let app = build_router(test_state(Arc::new(FixedProvider)));

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"session_id": "s1", "message": "what's on my plate?"}"#,
            ))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["session_id"], "s1");
        assert_eq!(body["reply"], "You have 3 open tasks.");
    }

    #[tokio::test]
    async fn malformed_chat_request_is_a_client_error() {
        let app = build_router(test_state(Arc::new(FixedProvider)));

        // Missing the "message" field
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"session_id": "s1"}"#))
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // Not JSON at all
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("who needs braces"))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_turn_is_bad_gateway_without_leaking_the_cause() {
        let app = build_router(test_state(Arc::new(FailingProvider)));

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"session_id": "s1", "message": "hello"}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("Sorry"));
        assert!(!error.contains("connection refused"));
    }

    #[tokio::test]
    async fn tools_endpoint_lists_the_registry() {
        let app = build_router(test_state(Arc::new(FixedProvider)));

        let req = Request::builder()
            .uri("/api/tools")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["count"], 26);
        let names: Vec<&str> = body["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"show_notion_tasks"));
        assert!(names.contains(&"github_create_repo"));
    }
}
