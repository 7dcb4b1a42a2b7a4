use axum::{extract::{rejection::JsonRejection, Path, State}, routing::get, Router, Json};
use axum::http::StatusCode;

use crate::{application::todo_service::TodoService, domain::todo::{Todo, TodoId}, http::types::ApiError};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.service.find_all().await.map_err(ApiError::internal)?;
    Ok(Json(todos))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    match state.service.find_by_id(id).await.map_err(ApiError::internal)? {
        Some(todo) => Ok(Json(todo)),
        None => Err(ApiError::not_found()),
    }
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<Todo>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let Json(todo) = payload?;
    let saved = state.service.save(todo).await.map_err(ApiError::internal)?;
    Ok(Json(saved))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, payload: Result<Json<Todo>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let Json(mut todo) = payload?;
    todo.id = Some(parse_id(&id)?);
    let saved = state.service.save(todo).await.map_err(ApiError::internal)?;
    Ok(Json(saved))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete_by_id(id).await.map_err(ApiError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> {
    s.parse::<i64>().map(TodoId).map_err(|_| ApiError::bad_request("invalid id"))
}
