//! HTTP routes under `/api/todos`.
//!
//! Handlers validate the path id before touching the body, so a bad id is
//! reported even when the body is also bad.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::error::TodoResult;
use crate::model::Todo;
use crate::service::TodoService;
use crate::validation::{validate_create, validate_id, validate_update};

pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bodies that are missing or not JSON are treated as `{}` so the field
/// validators produce the error message.
fn body_or_empty(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(%rejection, "request body ignored");
            Value::Object(Default::default())
        }
    }
}

async fn list_todos(State(service): State<TodoService>) -> TodoResult<Json<Vec<Todo>>> {
    Ok(Json(service.list_all().await?))
}

async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> TodoResult<Json<Todo>> {
    let id = validate_id(&id)?;
    Ok(Json(service.get_by_id(id).await?))
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<Value>, JsonRejection>,
) -> TodoResult<(StatusCode, Json<Todo>)> {
    let text = validate_create(&body_or_empty(body))?;
    let todo = service.create(&text).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> TodoResult<Json<Todo>> {
    let id = validate_id(&id)?;
    let patch = validate_update(&body_or_empty(body))?;
    Ok(Json(service.update(id, patch).await?))
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> TodoResult<Json<Todo>> {
    let id = validate_id(&id)?;
    Ok(Json(service.delete_by_id(id).await?))
}
