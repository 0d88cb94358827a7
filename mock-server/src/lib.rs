use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Number of todos the server is seeded with.
pub const TODO_COUNT: u32 = 200;

/// Token accepted by the `/secure` routes unless overridden.
pub const DEFAULT_TOKEN: &str = "fresh-token";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u32,
    pub user_id: u32,
    pub title: String,
    pub completed: bool,
}

/// Payload accepted by create and update. Missing fields are left out of the echo.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub user_id: Option<u32>,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone)]
pub struct AppState {
    todos: Arc<Vec<Todo>>,
    token: Arc<str>,
}

impl AppState {
    pub fn new(token: &str) -> Self {
        Self {
            todos: Arc::new(seed()),
            token: Arc::from(token),
        }
    }
}

fn seed() -> Vec<Todo> {
    (1..=TODO_COUNT)
        .map(|id| Todo {
            id,
            user_id: (id - 1) / 20 + 1,
            title: format!("todo {id}"),
            completed: id % 3 == 0,
        })
        .collect()
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).patch(update_todo).delete(delete_todo),
        )
        .route("/secure/todos/{id}", get(get_secure_todo))
        .route("/status/{code}", get(status))
        .with_state(AppState::new(token))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_token(listener, DEFAULT_TOKEN).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app_with_token(token)).await
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({})))
}

fn find(state: &AppState, id: u32) -> Option<&Todo> {
    state.todos.iter().find(|t| t.id == id)
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.todos.as_ref().clone())
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Todo>, (StatusCode, Json<Value>)> {
    find(&state, id).cloned().map(Json).ok_or_else(not_found)
}

/// Echoes the created todo with the next id. Nothing is persisted.
async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<TodoInput>,
) -> (StatusCode, Json<Value>) {
    let mut body = json!({ "id": state.todos.len() + 1 });
    merge(&mut body, input);
    (StatusCode::CREATED, Json(body))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let todo = find(&state, id).ok_or_else(not_found)?;
    let mut body = serde_json::to_value(todo).unwrap_or_else(|_| json!({ "id": id }));
    merge(&mut body, input);
    Ok(Json(body))
}

async fn delete_todo(Path(_id): Path<u32>) -> Json<Value> {
    Json(json!({}))
}

async fn get_secure_todo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u32>,
) -> Result<Json<Todo>, (StatusCode, Json<Value>)> {
    let expected = format!("Bearer {}", state.token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))));
    }
    find(&state, id).cloned().map(Json).ok_or_else(not_found)
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(json!({ "status": status.as_u16() })))
}

fn merge(body: &mut Value, input: TodoInput) {
    if let Some(user_id) = input.user_id {
        body["userId"] = json!(user_id);
    }
    if let Some(title) = input.title {
        body["title"] = json!(title);
    }
    if let Some(completed) = input.completed {
        body["completed"] = json!(completed);
    }
}
