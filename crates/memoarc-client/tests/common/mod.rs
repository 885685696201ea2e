#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";
pub const ME_EMAIL: &str = "ada@example.com";

#[derive(Clone, Default)]
pub struct MockBackend {
    pub content: Arc<Mutex<Vec<Value>>>,
    /// (username, email, password)
    pub users: Arc<Mutex<Vec<(String, String, String)>>>,
    pub preview_requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn with_user(self, username: &str, email: &str, password: &str) -> Self {
        self.users.lock().unwrap().push((
            username.to_string(),
            email.to_string(),
            password.to_string(),
        ));
        self
    }

    pub fn with_content(self, item: Value) -> Self {
        self.content.lock().unwrap().push(item);
        self
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
}

async fn signin(State(state): State<MockBackend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let users = state.users.lock().unwrap();
    match users.iter().find(|(_, e, _)| e == email) {
        Some((_, _, p)) if p == password => (StatusCode::OK, Json(json!({ "token": TOKEN }))),
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Incorrect password" })),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "User not found" })),
        ),
    }
}

async fn signup(State(state): State<MockBackend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    if !email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid email" })),
        );
    }

    let mut users = state.users.lock().unwrap();
    if users.iter().any(|(_, e, _)| *e == email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists", "field": "email" })),
        );
    }
    if users.iter().any(|(u, _, _)| *u == username) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists", "field": "username" })),
        );
    }

    users.push((username, email, password));
    (StatusCode::OK, Json(json!({ "message": "User created" })))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "email": ME_EMAIL })))
}

async fn view_content(State(state): State<MockBackend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let content = state.content.lock().unwrap().clone();
    (StatusCode::OK, Json(json!({ "content": content })))
}

async fn create_content(
    State(state): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut content = state.content.lock().unwrap();
    let id = format!("{}", content.len() + 1);
    content.push(json!({
        "_id": id,
        "link": body["link"],
        "type": body["type"],
    }));
    (StatusCode::OK, Json(json!({ "message": "Content added" })))
}

async fn preview(
    State(state): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let url = params.get("url").cloned().unwrap_or_default();
    state.preview_requests.lock().unwrap().push(url.clone());

    if url.contains("broken") {
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "message": "Upstream fetch failed" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "url": url,
            "domain": "example.com",
            "title": "Example Post",
            "description": "A post about examples",
            "image": "https://example.com/og.png",
            "siteName": "Example",
            "favicon": ""
        })),
    )
}

async fn oembed(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let url = params.get("url").cloned().unwrap_or_default();
    if url.contains("/status/0") {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({ "html": format!("<blockquote class=\"twitter-tweet\"><a href=\"{url}\"></a></blockquote>") })),
    )
}

pub fn router(state: MockBackend) -> Router {
    Router::new()
        .route("/signin", post(signin))
        .route("/signup", post(signup))
        .route("/me", get(me))
        .route("/content/view", get(view_content))
        .route("/content/create", post(create_content))
        .route("/preview", get(preview))
        .route("/oembed", get(oembed))
        .with_state(state)
}

/// Serve the mock backend on an ephemeral port and return its base URL.
pub async fn spawn_backend(state: MockBackend) -> String {
    spawn_router(router(state)).await
}

/// Serve any router on an ephemeral port and return its base URL.
pub async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let address = listener.local_addr().expect("Mock backend has no address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Mock backend stopped");
    });

    format!("http://{address}")
}
