//! Todo record and the patch applied to it by updates.
//!
//! `completedAt` always goes over the wire with millisecond precision and a
//! `Z` suffix (`2024-01-04T00:00:00.000Z`), whatever precision the store
//! keeps internally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo row, as stored and as returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub text: String,
    #[serde(default, with = "iso_millis")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Validated update payload. `None` leaves a field untouched;
/// `completed_at: Some(None)` clears the completion timestamp.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed_at.is_none()
    }

    /// Merge the supplied fields over `todo`.
    pub fn apply(self, todo: &mut Todo) {
        if let Some(text) = self.text {
            todo.text = text;
        }
        if let Some(completed_at) = self.completed_at {
            todo.completed_at = completed_at;
        }
    }
}

/// Render a timestamp the way clients expect it.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&super::format_timestamp(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(D::Error::custom)
            })
            .transpose()
    }
}
