//! Stateless request builder and response parser for the todo API.
//!
//! Each operation is a `build_*` method producing an `HttpRequest` and a
//! `parse_*` method consuming the matching `HttpResponse`.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTodo, ErrorBody, Todo, UpdateTodo};

const TODOS_PATH: &str = "/api/todos";

/// Synchronous, stateless client for the todo API. Holds only the base URL.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.base_url)
    }

    fn item_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}{TODOS_PATH}/{id}", self.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item_url(id))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::new(HttpMethod::Post, self.collection_url()).with_json_body(body))
    }

    pub fn build_update_todo(&self, id: i64, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::new(HttpMethod::Put, self.item_url(id)).with_json_body(body))
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.item_url(id))
    }

    /// Request against an arbitrary id segment. Used to exercise the server's
    /// id validation with values that are not integers.
    pub fn build_get_todo_raw(&self, raw_id: &str) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item_url(raw_id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 201)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }

    /// The server answers a delete with the todo as it was before removal.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_json(response, 200)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 400 {
        if let Ok(ErrorBody { error }) = serde_json::from_str(&response.body) {
            return Err(ApiError::BadRequest { message: error });
        }
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn json_header() -> Vec<(String, String)> {
        vec![("content-type".to_string(), "application/json".to_string())]
    }

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_todo_produces_correct_request() {
        let req = client().build_get_todo(7);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/todos/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_todo_produces_correct_request() {
        let input = CreateTodo {
            text: "Hello World 1".to_string(),
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/todos");
        assert_eq!(req.headers, json_header());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"text": "Hello World 1"}));
    }

    #[test]
    fn build_update_todo_omits_absent_fields() {
        let req = client()
            .build_update_todo(3, &UpdateTodo::complete_on("2024-01-04"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/todos/3");
        assert_eq!(req.headers, json_header());
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"completedAt": "2024-01-04"}));
    }

    #[test]
    fn build_update_todo_sends_null_to_reopen() {
        let req = client().build_update_todo(3, &UpdateTodo::reopen()).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"completedAt": null}));
    }

    #[test]
    fn update_todo_distinguishes_null_from_absent() {
        let reopen: UpdateTodo = serde_json::from_str(r#"{"completedAt":null}"#).unwrap();
        assert_eq!(reopen.completed_at, Some(None));

        let untouched: UpdateTodo = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
        assert_eq!(untouched.completed_at, None);
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/api/todos/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_todos_success() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":1,"text":"Test","completedAt":null},{"id":2,"text":"Done","completedAt":"2024-01-04T00:00:00.000Z"}]"#,
        );
        let todos = client().parse_list_todos(response).unwrap();
        assert_eq!(todos.len(), 2);
        assert!(!todos[0].is_completed());
        assert_eq!(todos[1].completed_at.as_deref(), Some("2024-01-04T00:00:00.000Z"));
    }

    #[test]
    fn parse_get_todo_not_found() {
        let response = HttpResponse::new(400, r#"{"error":"Todo with id 999 not found"}"#);
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.message(), Some("Todo with id 999 not found"));
    }

    #[test]
    fn parse_create_todo_success() {
        let response = HttpResponse::new(201, r#"{"id":1,"text":"New","completedAt":null}"#);
        let todo = client().parse_create_todo(response).unwrap();
        assert_eq!(
            todo,
            Todo {
                id: 1,
                text: "New".to_string(),
                completed_at: None
            }
        );
    }

    #[test]
    fn parse_create_todo_validation_error() {
        let response = HttpResponse::new(400, r#"{"error":"Text property is required"}"#);
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.message(), Some("Text property is required"));
    }

    #[test]
    fn parse_create_todo_wrong_status() {
        let response = HttpResponse::new(500, "internal error");
        let err = client().parse_create_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_bad_request_without_error_body() {
        let response = HttpResponse::new(400, "plain text");
        let err = client().parse_get_todo(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 400, .. }));
    }

    #[test]
    fn parse_delete_todo_returns_snapshot() {
        let response = HttpResponse::new(200, r#"{"id":4,"text":"Gone","completedAt":null}"#);
        let todo = client().parse_delete_todo(response).unwrap();
        assert_eq!(todo.id, 4);
        assert_eq!(todo.text, "Gone");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:3000/");
        let req = client.build_list_todos();
        assert_eq!(req.path, "http://localhost:3000/api/todos");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_list_todos(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
