//! In-process stand-in for the voice-agent platform REST API

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VALID_KEY: &str = "test-key-123";

#[derive(Default)]
pub struct MockState {
    agents: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    pub create_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub rate_limited: AtomicBool,
    pub delay_ms: AtomicU64,
}

impl MockState {
    pub fn agent_count(&self) -> usize {
        self.agents.lock().unwrap().len()
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.agents.lock().unwrap().last().cloned()
    }
}

pub struct MockPlatform {
    pub addr: SocketAddr,
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockPlatform {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            next_id: AtomicU64::new(1000),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/v1/agents/create", post(create_agent))
            .route("/api/v1/agents", get(list_agents))
            .route("/api/v1/agents/:id", get(get_agent))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api/v1", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockPlatform {
            addr,
            base_url,
            state,
        }
    }

    /// Pretend an agent already exists on the account
    pub fn seed_agent(&self, name: &str) -> String {
        self.seed(json!(name))
    }

    /// An agent created without a name; listings show `"name": null`
    pub fn seed_unnamed_agent(&self) -> String {
        self.seed(Value::Null)
    }

    fn seed(&self, name: Value) -> String {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state
            .agents
            .lock()
            .unwrap()
            .push(json!({"id": id, "name": name, "bot_type": "prompt"}));
        id.to_string()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", VALID_KEY))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Invalid API key"})),
    )
        .into_response()
}

async fn create_agent(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.create_calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return unauthorized();
    }

    if state.rate_limited.load(Ordering::SeqCst) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "7")],
            Json(json!({"error": "Quota exceeded"})),
        )
            .into_response();
    }

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if body["voice"]["provider"] == "unknown_vendor" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "Unsupported voice provider"})),
        )
            .into_response();
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let mut agent = body.clone();
    agent["id"] = json!(id);
    agent["bot_type"] = json!("prompt");
    state.agents.lock().unwrap().push(agent.clone());

    (StatusCode::OK, Json(agent)).into_response()
}

async fn list_agents(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);

    if !authorized(&headers) {
        return unauthorized();
    }

    let page_no = params
        .get("pageno")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    let page_size = params
        .get("pagesize")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10)
        .max(1);

    let agents = state.agents.lock().unwrap();
    let bots: Vec<Value> = agents
        .iter()
        .skip((page_no - 1) * page_size)
        .take(page_size)
        .map(|a| json!({"id": a["id"], "name": a["name"]}))
        .collect();
    let total = agents.len();
    Json(json!({"bots": bots, "total_records": total})).into_response()
}

async fn get_agent(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let found = state
        .agents
        .lock()
        .unwrap()
        .iter()
        .find(|a| a["id"].to_string() == id)
        .cloned();

    match found {
        Some(agent) => Json(agent).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Agent not found"}))).into_response(),
    }
}
