//! Domain errors for the todo service and their HTTP mapping.
//!
//! Client-caused failures (`InvalidInput`, `NotFound`) both answer 400 with
//! an `{"error": message}` body. Store failures answer 500 and are logged;
//! the underlying driver message never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    /// Request data failed a validation rule.
    #[error("{0}")]
    InvalidInput(String),

    /// No row exists for the referenced id.
    #[error("Todo with id {0} not found")]
    NotFound(i64),

    /// The backing store failed.
    #[error("store operation failed: {0}")]
    Store(#[from] sqlx::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;

impl TodoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // Missing rows are reported as 400, not 404; existing clients
            // depend on it.
            TodoError::InvalidInput(_) | TodoError::NotFound(_) => StatusCode::BAD_REQUEST,
            TodoError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            TodoError::Store(err) => {
                tracing::error!(error = %err, "todo store operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
