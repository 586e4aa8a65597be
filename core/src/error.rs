//! Error types for the todo API client.
//!
//! The server reports both invalid input and missing rows as 400 with an
//! `{"error": ...}` body; those land in `BadRequest` with the message intact.
//! Anything else unexpected lands in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request with 400 and an error message.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// The server returned a status other than the expected one or 400.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// The server's message for a rejected request, if this is one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { message } => Some(message),
            _ => None,
        }
    }

    /// Whether the server reported that the referenced todo does not exist.
    pub fn is_not_found(&self) -> bool {
        self.message().is_some_and(|message| {
            message.starts_with("Todo with id ") && message.ends_with(" not found")
        })
    }
}
