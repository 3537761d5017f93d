use axum::{extract::{Path, State}, routing::get, Router, Json};
use axum::http::StatusCode;

use crate::domain::{repository::TodoStore, todo::{Todo, TodoFields, TodoId, TodoPayload}};
use crate::http::types::ApiError;

pub const BASE_PATH: &str = "/api/todo/";

#[derive(Clone)]
pub struct AppState<S: TodoStore> { pub store: S }

pub fn router<S: TodoStore + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_todos::<S>).post(create_todo::<S>))
        .route("/api/todo/:id/", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoStore>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list().await.map_err(ApiError::internal)?;
    Ok(Json(todos))
}

async fn create_todo<S: TodoStore>(State(state): State<AppState<S>>, Json(payload): Json<TodoPayload>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let fields = validated(payload)?;
    let todo = state.store.create(fields).await.map_err(ApiError::internal)?;
    tracing::info!(id = %todo.id, "created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Json<Todo>, ApiError> {
    state.store.get(TodoId(id)).await.map_err(ApiError::internal)?.map(Json).ok_or_else(ApiError::not_found)
}

/// The id in the body, if any, is ignored in favour of the path.
async fn update_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<i64>, Json(payload): Json<TodoPayload>) -> Result<Json<Todo>, ApiError> {
    let fields = validated(payload)?;
    let updated = state.store.update(TodoId(id), fields).await.map_err(ApiError::internal)?;
    match updated {
        Some(t) => { tracing::info!(id = %t.id, "updated"); Ok(Json(t)) }
        None => Err(ApiError::not_found()),
    }
}

async fn delete_todo<S: TodoStore>(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let deleted = state.store.delete(TodoId(id)).await.map_err(ApiError::internal)?;
    if deleted { tracing::info!(id, "deleted"); Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::not_found()) }
}

fn validated(payload: TodoPayload) -> Result<TodoFields, ApiError> {
    let fields = payload.fields();
    fields.validate().map_err(|e| ApiError::bad_request(e.to_string()))?;
    Ok(fields)
}
