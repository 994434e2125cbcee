//! Mock Responses API backend for integration tests
//!
//! Implements `POST /v1/responses` and `GET /v1/models` with canned replies
//! and records every request body it receives

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Key the mock accepts as bearer token
pub const TEST_KEY: &str = "test-key";

/// How the mock answers `POST /v1/responses`
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{ "output_text": ... }`
    OutputText(String),
    /// Raw JSON body with status 200
    Body(Value),
    /// Error status with an OpenAI-style error object
    Error {
        status: u16,
        code: &'static str,
        param: Option<&'static str>,
        message: &'static str,
    },
}

/// Mock backend that returns predictable responses
pub struct MockApi {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    response_count: AtomicU32,
    model_list_count: AtomicU32,
    requests: Mutex<Vec<Value>>,
    reply: Reply,
    models: Vec<String>,
}

impl MockApi {
    /// Start a mock that answers every generation with `"Hello from mock API"`
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(Reply::OutputText("Hello from mock API".to_owned())).await
    }

    /// Start a mock with a specific generation reply
    pub async fn start_with(reply: Reply) -> anyhow::Result<Self> {
        let models = ["gpt-4o", "gpt-5", "gpt-5-mini", "o3", "gpt-5-nano"]
            .into_iter()
            .map(str::to_owned)
            .collect();

        let state = Arc::new(MockState {
            response_count: AtomicU32::new(0),
            model_list_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            reply,
            models,
        });

        let app = Router::new()
            .route("/v1/responses", routing::post(handle_responses))
            .route("/v1/models", routing::get(handle_models))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL including `/v1`, as configured for the upstream
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of `POST /v1/responses` calls received
    pub fn response_count(&self) -> u32 {
        self.state.response_count.load(Ordering::Relaxed)
    }

    /// Number of `GET /v1/models` calls received
    pub fn model_list_count(&self) -> u32 {
        self.state.model_list_count.load(Ordering::Relaxed)
    }

    /// Bodies of every accepted `POST /v1/responses` call, in order
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The most recent request body
    pub fn last_request(&self) -> Option<Value> {
        self.requests().pop()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_KEY}"))
}

fn api_error(status: StatusCode, code: &str, param: Option<&str>, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "param": param,
                "code": code
            }
        })),
    )
        .into_response()
}

fn unauthorized() -> Response {
    api_error(
        StatusCode::UNAUTHORIZED,
        "invalid_api_key",
        None,
        "Incorrect API key provided",
    )
}

async fn handle_responses(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.response_count.fetch_add(1, Ordering::Relaxed);

    if !authorized(&headers) {
        return unauthorized();
    }

    if let Ok(mut requests) = state.requests.lock() {
        requests.push(body.clone());
    }

    match &state.reply {
        Reply::OutputText(text) => Json(json!({
            "id": "resp_mock_1",
            "object": "response",
            "status": "completed",
            "model": body.get("model").cloned().unwrap_or(Value::Null),
            "output_text": text
        }))
        .into_response(),
        Reply::Body(body) => Json(body.clone()).into_response(),
        Reply::Error {
            status,
            code,
            param,
            message,
        } => api_error(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            *param,
            message,
        ),
    }
}

async fn handle_models(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.model_list_count.fetch_add(1, Ordering::Relaxed);

    if !authorized(&headers) {
        return unauthorized();
    }

    let data: Vec<Value> = state
        .models
        .iter()
        .map(|id| json!({"id": id, "object": "model", "created": 1_700_000_000, "owned_by": "mock"}))
        .collect();

    Json(json!({"object": "list", "data": data})).into_response()
}
