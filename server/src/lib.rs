//! Todo CRUD service over a relational store.
//!
//! # Overview
//! Five JSON endpoints under `/api/todos` (list, get, create, update, delete)
//! backed by a `TodoStore`. Requests flow routing → validation → service →
//! store, and every failure comes back as an `{"error": ...}` body.
//!
//! # Design
//! - The store is injected as `Arc<dyn TodoStore>`; production uses SQLite
//!   through sqlx, tests can use the in-memory store.
//! - Missing rows answer 400, the same as invalid input.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::{TodoError, TodoResult};
pub use model::{Todo, TodoPatch};
pub use service::TodoService;
pub use store::{MemoryTodoStore, SqliteTodoStore, TodoStore};

pub fn app(store: Arc<dyn TodoStore>) -> Router {
    routes::router(TodoService::new(store))
}

pub async fn run(listener: TcpListener, store: Arc<dyn TodoStore>) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
