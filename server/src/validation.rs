//! Request validation.
//!
//! Bodies are inspected as raw JSON so that a missing field, a field of the
//! wrong type and a body that is not an object at all all produce the same
//! field-level message.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{TodoError, TodoResult};
use crate::model::TodoPatch;

pub const INVALID_ID: &str = "id must be a valid number";
pub const TEXT_REQUIRED: &str = "Text property is required";
pub const INVALID_DATE: &str = "completedAt must be a valid date";

/// Parse a path segment as a todo id. Negative ids are rejected.
pub fn validate_id(raw: &str) -> TodoResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| TodoError::invalid_input(INVALID_ID))
}

/// Extract the text of a new todo.
pub fn validate_create(body: &Value) -> TodoResult<String> {
    match body.get("text") {
        Some(text) => validate_text(text),
        None => Err(TodoError::invalid_input(TEXT_REQUIRED)),
    }
}

/// Extract the fields an update supplies. Absent fields stay `None`.
pub fn validate_update(body: &Value) -> TodoResult<TodoPatch> {
    let text = body.get("text").map(validate_text).transpose()?;

    let completed_at = match body.get("completedAt") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(raw)) => Some(Some(parse_calendar_date(raw)?)),
        Some(_) => return Err(TodoError::invalid_input(INVALID_DATE)),
    };

    Ok(TodoPatch { text, completed_at })
}

fn validate_text(value: &Value) -> TodoResult<String> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(TodoError::invalid_input(TEXT_REQUIRED)),
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp and normalizes either to
/// midnight UTC of the calendar date.
pub fn parse_calendar_date(raw: &str) -> TodoResult<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.with_timezone(&Utc).date_naive())
        })
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| TodoError::invalid_input(INVALID_DATE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::format_timestamp;
    use serde_json::json;

    fn message(err: TodoError) -> String {
        err.to_string()
    }

    #[test]
    fn id_accepts_non_negative_integers() {
        assert_eq!(validate_id("0").unwrap(), 0);
        assert_eq!(validate_id("42").unwrap(), 42);
    }

    #[test]
    fn id_rejects_garbage_and_negatives() {
        for raw in ["not-valid", "", "1.5", "-3", "12abc"] {
            assert_eq!(message(validate_id(raw).unwrap_err()), INVALID_ID, "{raw:?}");
        }
    }

    #[test]
    fn create_requires_text() {
        assert_eq!(
            message(validate_create(&json!({"hello": "world"})).unwrap_err()),
            TEXT_REQUIRED
        );
        assert_eq!(
            message(validate_create(&json!({"text": "   "})).unwrap_err()),
            TEXT_REQUIRED
        );
        assert_eq!(
            message(validate_create(&json!({"text": 7})).unwrap_err()),
            TEXT_REQUIRED
        );
        assert_eq!(message(validate_create(&Value::Null).unwrap_err()), TEXT_REQUIRED);
    }

    #[test]
    fn create_keeps_text_as_sent() {
        assert_eq!(
            validate_create(&json!({"text": "Hello World 1"})).unwrap(),
            "Hello World 1"
        );
    }

    #[test]
    fn update_with_no_fields_is_an_empty_patch() {
        assert!(validate_update(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn update_rejects_empty_text() {
        assert_eq!(
            message(validate_update(&json!({"text": ""})).unwrap_err()),
            TEXT_REQUIRED
        );
    }

    #[test]
    fn update_normalizes_date_to_midnight_utc() {
        let patch = validate_update(&json!({"completedAt": "2024-01-04"})).unwrap();
        let at = patch.completed_at.flatten().unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-04T00:00:00.000Z");
    }

    #[test]
    fn update_accepts_full_timestamps() {
        let at = parse_calendar_date("2024-01-04T18:30:00+02:00").unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-04T00:00:00.000Z");

        // 23:30 at -05:00 is already the next day in UTC.
        let at = parse_calendar_date("2024-01-04T23:30:00-05:00").unwrap();
        assert_eq!(format_timestamp(&at), "2024-01-05T00:00:00.000Z");
    }

    #[test]
    fn update_rejects_bad_dates() {
        for body in [
            json!({"completedAt": "not a date"}),
            json!({"completedAt": "2024-02-30"}),
            json!({"completedAt": 20240104}),
            json!({"completedAt": true}),
        ] {
            assert_eq!(message(validate_update(&body).unwrap_err()), INVALID_DATE, "{body}");
        }
    }

    #[test]
    fn update_null_date_clears_completion() {
        let patch = validate_update(&json!({"completedAt": null})).unwrap();
        assert_eq!(patch.completed_at, Some(None));
    }
}
