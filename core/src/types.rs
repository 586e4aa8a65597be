//! Wire DTOs for the todo API.
//!
//! Defined independently of the server crate; the integration test catches
//! schema drift between the two. Timestamps stay as the strings the server
//! sends (`2024-01-04T00:00:00.000Z`).

use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed_at: Option<String>,
}

impl Todo {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub text: String,
}

/// Request payload for updating an existing todo. Only the fields present in
/// the JSON are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `Some(Some(date))` completes the todo (any date the server accepts,
    /// e.g. `2024-01-04`); `Some(None)` sends `null` and clears completion.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub completed_at: Option<Option<String>>,
}

impl UpdateTodo {
    pub fn complete_on(date: impl Into<String>) -> Self {
        Self {
            completed_at: Some(Some(date.into())),
            ..Self::default()
        }
    }

    pub fn reopen() -> Self {
        Self {
            completed_at: Some(None),
            ..Self::default()
        }
    }
}

/// A field that is present deserializes to `Some`, even when it is `null`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
