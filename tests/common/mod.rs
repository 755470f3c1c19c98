// SPDX-License-Identifier: MIT

//! In-process mock of the Esclavizador API for integration tests.
//!
//! Serves the real wire contract on an ephemeral port, counts calls per
//! endpoint, and exposes toggles for the failure modes the client must
//! handle (rejected refreshes, persistent 401s, flaky stop calls).

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use esclavizador::config::Config;
use esclavizador::models::{Tag, TimeEntry};
use esclavizador::store::{keys, MemoryStore, StateStore};
use esclavizador::ApiClient;

pub const PASSWORD: &str = "Secret123!";
pub const REFRESH_TOKEN: &str = "refresh-1";

/// Shared mock server state.
pub struct MockState {
    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub running_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,

    /// Refresh endpoint answers 401.
    pub fail_refresh: AtomicBool,
    /// Stop endpoint answers 500.
    pub fail_stop: AtomicBool,
    /// Running-status endpoint answers 500.
    pub fail_running: AtomicBool,
    /// Protected endpoints answer 401 even for freshly minted tokens.
    pub reject_all_bearers: AtomicBool,
    /// Artificial latency for the refresh endpoint, to widen the window in
    /// which concurrent callers pile onto one in-flight refresh.
    pub refresh_delay_ms: AtomicUsize,

    token_seq: AtomicUsize,
    valid_tokens: Mutex<HashSet<String>>,
    pub running_entry: Mutex<Option<TimeEntry>>,
    pub tags: Mutex<Vec<Tag>>,

    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
}

impl MockState {
    fn new() -> Self {
        Self {
            refresh_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            running_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            fail_refresh: AtomicBool::new(false),
            fail_stop: AtomicBool::new(false),
            fail_running: AtomicBool::new(false),
            reject_all_bearers: AtomicBool::new(false),
            refresh_delay_ms: AtomicUsize::new(0),
            token_seq: AtomicUsize::new(0),
            valid_tokens: Mutex::new(HashSet::new()),
            running_entry: Mutex::new(None),
            tags: Mutex::new(Vec::new()),
            user_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            email: "worker@example.com".to_string(),
        }
    }

    fn mint_token(&self) -> String {
        let n = self.token_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let token = format!("access-{n}");
        self.valid_tokens.lock().unwrap().insert(token.clone());
        token
    }

    fn bearer_ok(&self, headers: &HeaderMap) -> bool {
        if self.reject_all_bearers.load(Ordering::SeqCst) {
            return false;
        }
        let Some(value) = headers.get(header::AUTHORIZATION).and_then(|h| h.to_str().ok()) else {
            return false;
        };
        let Some(token) = value.strip_prefix("Bearer ") else {
            return false;
        };
        self.valid_tokens.lock().unwrap().contains(token)
    }

    fn user_json(&self) -> Value {
        json!({
            "id": self.user_id,
            "email": self.email,
            "role": "worker",
            "organization_id": self.organization_id,
            "is_active": true,
            "created_at": Utc::now(),
        })
    }

    /// Build a running entry owned by the mock user.
    pub fn make_entry(&self, project_name: &str, start_time: DateTime<Utc>) -> TimeEntry {
        TimeEntry {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            user_email: self.email.clone(),
            project_id: Uuid::new_v4(),
            project_name: project_name.to_string(),
            task_id: None,
            task_name: None,
            organization_id: self.organization_id,
            start_time,
            end_time: None,
            is_running: true,
            is_billable: true,
            description: None,
            duration_seconds: None,
            tags: Vec::new(),
            created_at: start_time,
        }
    }
}

/// A running mock API instance.
pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockApi {
    /// Client config pointed at this mock.
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.base_url.clone(),
            state_dir: std::env::temp_dir().join("esclavizador-test"),
            http_timeout_secs: 5,
        }
    }

    /// Fresh client over an in-memory store.
    pub fn client(&self) -> (ApiClient, Arc<dyn StateStore>) {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let api = ApiClient::new(&self.config(), Arc::clone(&store)).unwrap();
        (api, store)
    }

    /// Seed a store with a valid session (fresh access token).
    pub fn seed_valid_session(&self, store: &dyn StateStore) {
        let token = self.state.mint_token();
        store.put(keys::AUTH_TOKEN, &token).unwrap();
        store.put(keys::REFRESH_TOKEN, REFRESH_TOKEN).unwrap();
    }

    /// Seed a store with an expired access token but a valid refresh token.
    pub fn seed_stale_session(&self, store: &dyn StateStore) {
        store.put(keys::AUTH_TOKEN, "expired-access").unwrap();
        store.put(keys::REFRESH_TOKEN, REFRESH_TOKEN).unwrap();
    }
}

/// Start the mock API on an ephemeral port.
pub async fn spawn_mock_api() -> MockApi {
    let state = Arc::new(MockState::new());

    let app = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/time-entries/running", get(running))
        .route("/api/v1/time-entries/start", post(start_timer))
        .route("/api/v1/time-entries/{id}/stop", post(stop_timer))
        .route("/api/v1/tags", get(list_tags).post(create_tag))
        .route("/api/v1/tags/{id}", axum::routing::delete(delete_tag))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockApi {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["password"] == json!(PASSWORD) {
        let token = state.mint_token();
        (
            StatusCode::OK,
            Json(json!({
                "access_token": token,
                "refresh_token": REFRESH_TOKEN,
                "token_type": "bearer",
                "expires_in": 1800,
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect email or password" })),
        )
            .into_response()
    }
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay as u64)).await;
    }

    if state.fail_refresh.load(Ordering::SeqCst) || body["refresh_token"] != json!(REFRESH_TOKEN) {
        return unauthorized();
    }

    let token = state.mint_token();
    (
        StatusCode::OK,
        Json(json!({
            "access_token": token,
            "token_type": "bearer",
            "expires_in": 1800,
        })),
    )
        .into_response()
}

async fn logout(State(_state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["refresh_token"] == json!(REFRESH_TOKEN) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        unauthorized()
    }
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(state.user_json())).into_response()
}

async fn running(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.running_calls.fetch_add(1, Ordering::SeqCst);
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    if state.fail_running.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database unavailable" })),
        )
            .into_response();
    }
    let entry = state.running_entry.lock().unwrap().clone();
    (StatusCode::OK, Json(json!(entry))).into_response()
}

async fn start_timer(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.start_calls.fetch_add(1, Ordering::SeqCst);
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }

    let mut running = state.running_entry.lock().unwrap();
    if running.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "detail": "A timer is already running" })),
        )
            .into_response();
    }

    let mut entry = state.make_entry("P1", Utc::now());
    if let Some(id) = body["project_id"].as_str().and_then(|s| s.parse().ok()) {
        entry.project_id = id;
    }
    entry.description = body["description"].as_str().map(String::from);
    entry.is_billable = body["is_billable"].as_bool().unwrap_or(true);
    *running = Some(entry.clone());

    (StatusCode::CREATED, Json(json!(entry))).into_response()
}

async fn list_tags(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    let tags = state.tags.lock().unwrap().clone();
    let total = tags.len();
    (
        StatusCode::OK,
        Json(json!({
            "items": tags,
            "total": total,
            "limit": 50,
            "offset": 0,
        })),
    )
        .into_response()
}

async fn create_tag(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    let Some(name) = body["name"].as_str().filter(|n| !n.trim().is_empty()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "name must not be empty" })),
        )
            .into_response();
    };

    let tag = Tag {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        organization_id: state.organization_id,
        created_at: Utc::now(),
    };
    state.tags.lock().unwrap().push(tag.clone());
    (StatusCode::CREATED, Json(json!(tag))).into_response()
}

async fn delete_tag(
    State(state): State<Arc<MockState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    let mut tags = state.tags.lock().unwrap();
    let before = tags.len();
    tags.retain(|t| t.id != id);
    if tags.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Tag not found" })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn stop_timer(
    State(state): State<Arc<MockState>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    state.stop_calls.fetch_add(1, Ordering::SeqCst);
    if !state.bearer_ok(&headers) {
        return unauthorized();
    }
    if state.fail_stop.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database unavailable" })),
        )
            .into_response();
    }

    let mut running = state.running_entry.lock().unwrap();
    match running.take() {
        Some(mut entry) if entry.id == id => {
            let end = Utc::now();
            entry.end_time = Some(end);
            entry.is_running = false;
            entry.duration_seconds = Some((end - entry.start_time).num_seconds());
            (StatusCode::OK, Json(json!(entry))).into_response()
        }
        other => {
            *running = other;
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Time entry not found" })),
            )
                .into_response()
        }
    }
}
