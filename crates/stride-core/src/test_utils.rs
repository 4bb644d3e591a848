//! Test utilities for stride-core
//!
//! A mock OpenAI-compatible server for backend and integration tests. It
//! answers `/v1/models` and `/v1/chat/completions`, and records the last
//! chat request so tests can check what was sent.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::{oneshot, Mutex};

/// Canned progress reply used when no fixed reply is configured
pub const PROGRESS_REPLY: &str = r#"{"overall_progress": 25, "progress_increase": 5, "reasoning": "Steady practice", "feedback": "Nice consistency, keep it up."}"#;

/// Canned coaching reply used when no fixed reply is configured
pub const COACHING_REPLY: &str = r#"{"milestones": [{"title": "Finish unit one", "description": "Complete the first unit", "timeline": "1 week", "priority": "high"}], "habits": [{"name": "Flashcards", "description": "Ten minutes of review", "frequency": "daily", "impact": "high"}], "advice": "Practice a little every day."}"#;

#[derive(Default)]
struct ServerState {
    /// Fixed reply for every chat request
    reply: Option<String>,
    failing: bool,
    last_request: Mutex<Option<Value>>,
    last_authorization: Mutex<Option<String>>,
    request_count: Mutex<usize>,
}

/// Mock OpenAI-compatible server for testing
pub struct MockOpenAIServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOpenAIServer {
    /// Start a server that answers progress and coaching prompts with
    /// well-formed canned replies
    pub async fn start() -> Self {
        Self::spawn(ServerState::default()).await
    }

    /// Start a server that answers every chat request with `reply`
    pub async fn start_with_reply(reply: &str) -> Self {
        Self::spawn(ServerState {
            reply: Some(reply.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Start a server that answers every request with a 500
    pub async fn start_failing() -> Self {
        Self::spawn(ServerState {
            failing: true,
            ..Default::default()
        })
        .await
    }

    async fn spawn(state: ServerState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The body of the most recent chat request
    pub async fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().await.clone()
    }

    /// The Authorization header of the most recent chat request
    pub async fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().await.clone()
    }

    /// Number of chat requests received
    pub async fn request_count(&self) -> usize {
        *self.state.request_count.lock().await
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models(State(state): State<Arc<ServerState>>) -> Response {
    if state.failing {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-3.5-turbo", "object": "model"}, {"id": "gpt-4", "object": "model"}]
    }))
    .into_response()
}

async fn handle_chat(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    *state.request_count.lock().await += 1;
    *state.last_authorization.lock().await = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let reply = match (&state.reply, is_coaching_request(&request)) {
        (Some(reply), _) => reply.clone(),
        (None, true) => COACHING_REPLY.to_string(),
        (None, false) => PROGRESS_REPLY.to_string(),
    };
    let model = request["model"].as_str().unwrap_or("mock").to_string();
    *state.last_request.lock().await = Some(request);

    if state.failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "mock failure"}})),
        )
            .into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": reply},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Coaching prompts ask for milestones; everything else is a progress prompt
fn is_coaching_request(request: &Value) -> bool {
    request["messages"]
        .as_array()
        .is_some_and(|messages| {
            messages.iter().any(|m| {
                m["content"]
                    .as_str()
                    .is_some_and(|c| c.contains("milestones"))
            })
        })
}
