use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{
    domain::{
        repository::TodoRepository,
        todo::{clean_title, Deleted, NewTodo, Todo, TodoId, TodoPatch},
    },
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<R: TodoRepository> { pub repo: R }

pub fn router<R: TodoRepository + Clone>(state: AppState<R>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<R>).post(create_todo::<R>))
        .route("/todos/:id", get(get_todo::<R>).patch(update_todo::<R>).delete(delete_todo::<R>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams { completed: Option<bool> }

async fn list_todos<R: TodoRepository + Clone>(State(state): State<AppState<R>>, Query(params): Query<ListParams>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.repo.list(params.completed).await.map_err(ApiError::internal)?;
    Ok(Json(todos))
}

async fn create_todo<R: TodoRepository + Clone>(State(state): State<AppState<R>>, Json(payload): Json<NewTodo>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let title = clean_title(&payload.title).ok_or_else(|| ApiError::unprocessable("title must not be blank"))?;
    let todo = state.repo.create(NewTodo { title, completed: payload.completed }).await.map_err(ApiError::internal)?;
    tracing::info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo<R: TodoRepository + Clone>(State(state): State<AppState<R>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let todo = state.repo.get(&TodoId(id)).await.map_err(ApiError::internal)?;
    todo.map(Json).ok_or_else(ApiError::not_found)
}

async fn update_todo<R: TodoRepository + Clone>(State(state): State<AppState<R>>, Path(id): Path<String>, Json(mut payload): Json<TodoPatch>) -> Result<Json<Todo>, ApiError> {
    if let Some(title) = payload.title.take() {
        payload.title = Some(clean_title(&title).ok_or_else(|| ApiError::unprocessable("title must not be blank"))?);
    }
    let updated = state.repo.update(&TodoId(id), payload).await.map_err(ApiError::internal)?;
    updated.map(Json).ok_or_else(ApiError::not_found)
}

async fn delete_todo<R: TodoRepository + Clone>(State(state): State<AppState<R>>, Path(id): Path<String>) -> Result<Json<Deleted>, ApiError> {
    let id = TodoId(id);
    let deleted = state.repo.delete(&id).await.map_err(ApiError::internal)?;
    if deleted {
        tracing::info!(%id, "todo deleted");
        Ok(Json(Deleted { id }))
    } else {
        Err(ApiError::not_found())
    }
}
