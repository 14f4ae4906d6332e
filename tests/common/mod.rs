#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use projectdesk::api::{Api, ApiClient};
use projectdesk::gate::AuthorizationGate;
use projectdesk::models::{Credentials, User};
use projectdesk::App;

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Canned response for every request matching method and path
#[derive(Debug, Clone)]
struct Failure {
    method: String,
    path: String,
    status: u16,
    body: String,
}

#[derive(Default)]
pub struct Backend {
    next_id: u64,
    pub projects: Vec<Value>,
    pub checklists: HashMap<String, Vec<Value>>,
    pub posts: HashMap<String, Vec<Value>>,
    pub tokens: HashMap<String, Value>,
    pub requests: Vec<Recorded>,
    failures: Vec<Failure>,
}

type Shared = Arc<Mutex<Backend>>;

impl Backend {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Value> {
        self.projects.iter_mut().find(|p| id_of(p) == id)
    }

    fn post_mut(&mut self, project: &str, post: &str) -> Option<&mut Value> {
        self.posts
            .get_mut(project)?
            .iter_mut()
            .find(|p| id_of(p) == post)
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<Value> {
        bearer(headers).and_then(|token| self.tokens.get(&token).cloned())
    }
}

/// In-memory project service on a free local port, torn down on drop
pub struct MockService {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

impl Drop for MockService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockService {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock service")?;

        let state = Shared::default();
        let app = router(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            state,
            handle,
        })
    }

    pub fn backend(&self) -> MutexGuard<'_, Backend> {
        self.state.lock().unwrap()
    }

    pub fn app(&self) -> Result<App> {
        self.app_with_gate(AuthorizationGate::default())
    }

    pub fn app_with_gate(&self, gate: AuthorizationGate) -> Result<App> {
        let client = ApiClient::new(&self.base_url)?;
        Ok(App::new(Api::new(client), gate))
    }

    /// A fresh client already logged in as alice
    pub async fn alice(&self) -> Result<App> {
        let app = self.app()?;
        app.login(&alice_credentials(), None).await?;
        Ok(app)
    }

    pub async fn bob(&self) -> Result<App> {
        let app = self.app()?;
        app.login(&Credentials::new("bob", "hunter2"), None).await?;
        Ok(app)
    }

    /// Answer `method path` with `status` and a raw body until cleared
    pub fn fail(&self, method: &str, path: &str, status: u16, body: &str) {
        self.backend().failures.push(Failure {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    pub fn clear_failures(&self) {
        self.backend().failures.clear();
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.backend().requests.clone()
    }

    /// Requests for `method path`, excluding the rest of the traffic
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn seed_project(&self, name: &str, status: &str) -> String {
        let mut backend = self.backend();
        let id = backend.next_id("p");
        backend.projects.push(json!({
            "id": id,
            "name": name,
            "description": format!("{} description", name),
            "status": status,
            "startDate": "2024-01-01",
            "endDate": "2024-12-31"
        }));
        backend.checklists.insert(id.clone(), Vec::new());
        backend.posts.insert(id.clone(), Vec::new());
        id
    }

    pub fn seed_item(&self, project: &str, title: &str, status: &str) -> String {
        let mut backend = self.backend();
        let id = backend.next_id("item");
        backend.checklists.entry(project.to_string()).or_default().push(json!({
            "id": id,
            "title": title,
            "description": "",
            "dueDate": "2024-05-01",
            "priority": "MEDIUM",
            "status": status
        }));
        id
    }

    pub fn seed_post(&self, project: &str, author_id: &str, title: &str, post_type: &str) -> String {
        let mut backend = self.backend();
        let id = backend.next_id("post");
        backend.posts.entry(project.to_string()).or_default().push(json!({
            "id": id,
            "title": title,
            "content": format!("{} content", title),
            "type": post_type,
            "author": known_user(author_id),
            "createdAt": "2024-03-01T09:00:00Z",
            "comments": []
        }));
        id
    }

    pub fn seed_comment(&self, project: &str, post: &str, author_id: &str, content: &str) -> String {
        let mut backend = self.backend();
        let id = backend.next_id("c");
        if let Some(post) = backend.post_mut(project, post) {
            if let Some(comments) = post["comments"].as_array_mut() {
                comments.push(json!({
                    "id": id,
                    "content": content,
                    "author": known_user(author_id),
                    "createdAt": "2024-03-01T10:00:00Z"
                }));
            }
        }
        id
    }
}

pub fn alice_credentials() -> Credentials {
    Credentials::new("alice", "secret")
}

pub fn alice() -> User {
    serde_json::from_value(known_user("u1")).unwrap()
}

/// A base URL nothing listens on
pub fn unused_base_url() -> String {
    let port = portpicker::pick_unused_port().expect("no free port");
    format!("http://127.0.0.1:{}/api", port)
}

fn known_user(id: &str) -> Value {
    match id {
        "u1" => json!({"id": "u1", "name": "Alice"}),
        "u2" => json!({"id": "u2", "name": "Bob"}),
        other => json!({"id": other, "name": other}),
    }
}

fn id_of(value: &Value) -> String {
    match &value["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/:id/checklist", get(list_items).post(create_item))
        .route("/api/projects/:id/checklist/:item_id", put(update_item))
        .route("/api/projects/:id/posts", get(list_posts).post(create_post))
        .route(
            "/api/projects/:id/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/projects/:id/posts/:post_id/comments", post(add_comment))
        .route(
            "/api/projects/:id/posts/:post_id/comments/:comment_id",
            put(update_comment).delete(delete_comment),
        )
        .route(
            "/api/projects/:id/posts/:post_id/questions/:question_id/answers",
            post(answer_question),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let failure = {
        let mut backend = state.lock().unwrap();
        backend.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            body: serde_json::from_slice(&bytes).ok(),
        });
        backend
            .failures
            .iter()
            .find(|f| f.method == method && f.path == path)
            .cloned()
    };

    if let Some(failure) = failure {
        let status = StatusCode::from_u16(failure.status).unwrap();
        return (status, failure.body).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let user_id = match (body["username"].as_str(), body["password"].as_str()) {
        (Some("alice"), Some("secret")) => "u1",
        (Some("bob"), Some("hunter2")) => "u2",
        _ => return message(StatusCode::UNAUTHORIZED, "Invalid username or password"),
    };
    let user = known_user(user_id);
    let token = format!("token-{}", user_id);
    state.lock().unwrap().tokens.insert(token.clone(), user.clone());
    Json(json!({ "user": user, "token": token })).into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(token) = bearer(&headers) {
        state.lock().unwrap().tokens.remove(&token);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match state.lock().unwrap().user_for(&headers) {
        Some(user) => Json(user).into_response(),
        None => message(StatusCode::UNAUTHORIZED, "Not authenticated"),
    }
}

async fn list_projects(State(state): State<Shared>) -> Response {
    Json(Value::Array(state.lock().unwrap().projects.clone())).into_response()
}

async fn create_project(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let id = backend.next_id("p");
    body["id"] = json!(id);
    if body.get("status").is_none() {
        body["status"] = json!("IN_PROGRESS");
    }
    backend.projects.push(body.clone());
    backend.checklists.insert(id.clone(), Vec::new());
    backend.posts.insert(id, Vec::new());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_project(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.lock().unwrap().project_mut(&id) {
        Some(project) => Json(project.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Project not found"),
    }
}

async fn update_project(State(state): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    match state.lock().unwrap().project_mut(&id) {
        Some(project) => {
            merge(project, &body);
            Json(project.clone()).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Project not found"),
    }
}

async fn delete_project(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut backend = state.lock().unwrap();
    let before = backend.projects.len();
    backend.projects.retain(|p| id_of(p) != id);
    if backend.projects.len() == before {
        return message(StatusCode::NOT_FOUND, "Project not found");
    }
    backend.checklists.remove(&id);
    backend.posts.remove(&id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_items(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.lock().unwrap().checklists.get(&id) {
        Some(items) => Json(Value::Array(items.clone())).into_response(),
        None => message(StatusCode::NOT_FOUND, "Project not found"),
    }
}

async fn create_item(State(state): State<Shared>, Path(id): Path<String>, Json(mut body): Json<Value>) -> Response {
    let mut backend = state.lock().unwrap();
    let item_id = backend.next_id("item");
    let Some(items) = backend.checklists.get_mut(&id) else {
        return message(StatusCode::NOT_FOUND, "Project not found");
    };
    body["id"] = json!(item_id);
    body["status"] = json!("PENDING");
    if body.get("priority").is_none() {
        body["priority"] = json!("MEDIUM");
    }
    items.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_item(
    State(state): State<Shared>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let item = backend
        .checklists
        .get_mut(&id)
        .and_then(|items| items.iter_mut().find(|item| id_of(item) == item_id));
    match item {
        Some(item) => {
            merge(item, &body);
            Json(item.clone()).into_response()
        }
        // Empty body on purpose: the client must still produce a message
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_posts(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    match state.lock().unwrap().posts.get(&id) {
        Some(posts) => Json(Value::Array(posts.clone())).into_response(),
        None => message(StatusCode::NOT_FOUND, "Project not found"),
    }
}

async fn create_post(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let Some(author) = backend.user_for(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "Not authenticated");
    };
    let post_id = backend.next_id("post");
    let Some(posts) = backend.posts.get_mut(&id) else {
        return message(StatusCode::NOT_FOUND, "Project not found");
    };
    body["id"] = json!(post_id);
    body["author"] = author;
    body["createdAt"] = json!("2024-03-02T12:00:00Z");
    body["comments"] = json!([]);
    posts.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn get_post(State(state): State<Shared>, Path((id, post_id)): Path<(String, String)>) -> Response {
    match state.lock().unwrap().post_mut(&id, &post_id) {
        Some(post) => Json(post.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Post not found"),
    }
}

async fn update_post(
    State(state): State<Shared>,
    Path((id, post_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    match state.lock().unwrap().post_mut(&id, &post_id) {
        Some(post) => {
            merge(post, &body);
            Json(post.clone()).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Post not found"),
    }
}

async fn delete_post(State(state): State<Shared>, Path((id, post_id)): Path<(String, String)>) -> Response {
    let mut backend = state.lock().unwrap();
    let Some(posts) = backend.posts.get_mut(&id) else {
        return message(StatusCode::NOT_FOUND, "Project not found");
    };
    posts.retain(|p| id_of(p) != post_id);
    StatusCode::NO_CONTENT.into_response()
}

async fn add_comment(
    State(state): State<Shared>,
    Path((id, post_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let comment_id = backend.next_id("c");
    let author = known_user(&id_of(&json!({ "id": body["authorId"] })));
    let Some(post) = backend.post_mut(&id, &post_id) else {
        return message(StatusCode::NOT_FOUND, "Post not found");
    };
    let comment = json!({
        "id": comment_id,
        "content": body["content"],
        "author": author,
        "createdAt": "2024-03-02T13:00:00Z"
    });
    if let Some(comments) = post["comments"].as_array_mut() {
        comments.push(comment.clone());
    }
    (StatusCode::CREATED, Json(comment)).into_response()
}

async fn update_comment(
    State(state): State<Shared>,
    Path((id, post_id, comment_id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let comment = backend
        .post_mut(&id, &post_id)
        .and_then(|post| post["comments"].as_array_mut())
        .and_then(|comments| comments.iter_mut().find(|c| id_of(c) == comment_id));
    match comment {
        Some(comment) => {
            comment["content"] = body["content"].clone();
            Json(comment.clone()).into_response()
        }
        None => message(StatusCode::NOT_FOUND, "Comment not found"),
    }
}

async fn delete_comment(
    State(state): State<Shared>,
    Path((id, post_id, comment_id)): Path<(String, String, String)>,
) -> Response {
    let mut backend = state.lock().unwrap();
    if let Some(comments) = backend
        .post_mut(&id, &post_id)
        .and_then(|post| post["comments"].as_array_mut())
    {
        comments.retain(|c| id_of(c) != comment_id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn answer_question(
    State(state): State<Shared>,
    Path((id, post_id, _question_id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = state.lock().unwrap();
    let answer_id = backend.next_id("a");
    if backend.post_mut(&id, &post_id).is_none() {
        return message(StatusCode::NOT_FOUND, "Post not found");
    }
    let answer = json!({
        "id": answer_id,
        "content": body["content"],
        "author": known_user(&id_of(&json!({ "id": body["authorId"] }))),
        "createdAt": "2024-03-02T14:00:00Z"
    });
    (StatusCode::CREATED, Json(answer)).into_response()
}
